use crate::errors::UpstreamError;
use reqwest::{Client, Method};
use std::collections::HashMap;

/// 通用的請求函數，回傳成功時的 body 字串
pub async fn get_raw_string(
    request_client: &Client,
    service: &'static str,
    url: &str,
    method: Method,
    headers: Option<HashMap<&str, String>>,
    form_data_pairs: Option<Vec<(&str, &str)>>,
) -> Result<String, UpstreamError> {
    // 建立基本請求
    let mut request_builder = request_client.request(method, url);

    // 添加自訂標頭
    if let Some(headers_map) = headers {
        request_builder = headers_map
            .iter()
            .fold(request_builder, |builder, (key, value)| {
                builder.header(*key, value)
            });
    }

    // 添加表單數據（若有提供）
    if let Some(form_pairs) = form_data_pairs {
        request_builder = request_builder
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(encode_form(&form_pairs));
    }

    let response = request_builder
        .send()
        .await
        .map_err(|err| UpstreamError::network(service, err))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|err| UpstreamError::network(service, err))?;

    if !status.is_success() {
        return Err(UpstreamError::from_status(service, status, body));
    }

    Ok(body)
}

pub fn encode_form(form_pairs: &[(&str, &str)]) -> String {
    form_pairs
        .iter()
        .fold(
            form_urlencoded::Serializer::new(String::new()),
            |mut serializer, &(key, value)| {
                serializer.append_pair(key, value);
                serializer
            },
        )
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_jwt_bearer_grant() {
        let body = encode_form(&[
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", "a.b c"),
        ]);

        assert_eq!(
            body,
            "grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer&assertion=a.b+c"
        );
    }
}
