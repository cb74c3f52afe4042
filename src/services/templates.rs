use crate::structs::templates::{Template, TemplateCatalog, TemplateFamily};
use anyhow::Context;
use regex::{Captures, Regex};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::LazyLock;

pub const MISSING_VALUE: &str = "N/A";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid placeholder regex"));

/// 內建模板，若有 TEMPLATES_PATH 則以檔案內容覆蓋
pub fn load_catalog(path: Option<&str>) -> anyhow::Result<TemplateCatalog> {
    let mut catalog = TemplateCatalog::builtin();

    if let Some(path) = path {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read templates file {}", path))?;
        let overrides =
            parse_overrides(&raw).with_context(|| format!("invalid templates file {}", path))?;
        merge(&mut catalog, overrides);
        tracing::info!("loaded template overrides from {}", path);
    }

    Ok(catalog)
}

/// `{"incident": {"detection": {"title": .., "emoji": .., "template": ..}}}`
pub fn parse_overrides(raw: &str) -> anyhow::Result<Vec<TemplateFamily>> {
    let root: Map<String, Value> = serde_json::from_str(raw)?;

    root.into_iter()
        .map(|(family, stages)| -> anyhow::Result<TemplateFamily> {
            let stages: Map<String, Value> = serde_json::from_value(stages)
                .with_context(|| format!("family {} must be an object", family))?;
            let stages = stages
                .into_iter()
                .map(|(stage, template)| {
                    serde_json::from_value::<Template>(template)
                        .with_context(|| format!("invalid template {}.{}", family, stage))
                        .map(|template| (stage.to_lowercase(), template))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;

            Ok(TemplateFamily {
                name: family.to_lowercase(),
                stages,
            })
        })
        .collect()
}

fn merge(catalog: &mut TemplateCatalog, overrides: Vec<TemplateFamily>) {
    for family in overrides {
        match catalog
            .families
            .iter_mut()
            .find(|existing| existing.name == family.name)
        {
            Some(existing) => {
                for (stage, template) in family.stages {
                    match existing.stages.iter_mut().find(|(name, _)| *name == stage) {
                        Some(slot) => slot.1 = template,
                        None => existing.stages.push((stage, template)),
                    }
                }
            }
            None => catalog.families.push(family),
        }
    }
}

/// 代入 `{name}`：`timestamp` 一律用當下時間，其餘用呼叫者給的值（鍵不分大小寫），沒有就是 N/A
pub fn fill_template(body: &str, timestamp: &str, params: &HashMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(body, |caps: &Captures| {
            let key = caps[1].to_lowercase();
            if key == "timestamp" {
                return timestamp.to_string();
            }
            params
                .get(&key)
                .cloned()
                .unwrap_or_else(|| MISSING_VALUE.to_string())
        })
        .into_owned()
}

/// 依字元數截斷，避免切到多位元組字元
pub fn truncate(text: String, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => {
            let mut truncated = text[..index].to_string();
            truncated.push('…');
            truncated
        }
        None => text,
    }
}
