use crate::{
    config::AppConfig,
    errors::AppError,
    services::{
        cards::{incident_form_card, mep_form_card, message_card},
        dates::format_timestamp,
        oncall,
        templates::{fill_template, truncate},
    },
    state::AppState,
    structs::{
        chat::{ChatReply, Message},
        templates::{Template, TemplateCatalog, TemplateFamily},
    },
};
use chrono::DateTime;
use chrono_tz::Tz;
use std::collections::HashMap;

pub const GREETING: &str = "Bonjour ! Utilisez `/incident` ou `/mep` pour démarrer.";

/// 一則訊息拆出來的指令
#[derive(Debug, Default, PartialEq)]
pub struct CommandLine {
    pub family: String,
    pub stage: Option<String>,
    pub params: HashMap<String, String>,
}

#[derive(Debug, PartialEq)]
pub enum Route<'a> {
    Template {
        family: &'a TemplateFamily,
        stage: &'a str,
        template: &'a Template,
    },
    StageHelp(&'a TemplateFamily),
    IncidentForm,
    MepForm,
    OnCall,
    Help,
    Greeting,
}

fn strip_command(token: &str) -> String {
    token.trim_start_matches('/').to_lowercase()
}

fn blank_to_none(text: Option<&str>) -> Option<&str> {
    text.filter(|text| !text.trim().is_empty())
}

/// `key=value` 形式的參數，沒有 `=` 的字接到上一個值後面
fn parse_params<'a>(tokens: impl Iterator<Item = &'a str>) -> HashMap<String, String> {
    let mut params = HashMap::new();
    let mut last_key: Option<String> = None;

    for token in tokens {
        match token.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                let key = key.to_lowercase();
                params.insert(key.clone(), value.to_string());
                last_key = Some(key);
            }
            _ => {
                if let Some(value) = last_key.as_ref().and_then(|key| params.get_mut(key)) {
                    if !value.is_empty() {
                        value.push(' ');
                    }
                    value.push_str(token);
                }
            }
        }
    }

    params
}

pub fn parse_message(message: &Message) -> Option<CommandLine> {
    let slash_name = message
        .slash_command
        .as_ref()
        .and_then(|command| blank_to_none(command.command_name.as_deref()));

    let (family, mut args): (String, Vec<&str>) = match slash_name {
        Some(name) => {
            let args: Vec<&str> = match blank_to_none(message.argument_text.as_deref()) {
                Some(argument) => argument.split_whitespace().collect(),
                None => message
                    .text
                    .as_deref()
                    .unwrap_or_default()
                    .split_whitespace()
                    .skip(1)
                    .collect(),
            };
            (strip_command(name), args)
        }
        None => {
            let text = blank_to_none(message.argument_text.as_deref())
                .or(message.text.as_deref())
                .unwrap_or_default();
            let mut tokens = text.split_whitespace();
            let family = strip_command(tokens.next()?);
            (family, tokens.collect())
        }
    };

    if family.is_empty() {
        return None;
    }

    let stage = if args.first().is_some_and(|token| !token.contains('=')) {
        Some(args.remove(0).to_lowercase())
    } else {
        None
    };

    Some(CommandLine {
        family,
        stage,
        params: parse_params(args.into_iter()),
    })
}

pub fn route<'a>(catalog: &'a TemplateCatalog, line: &'a CommandLine) -> Route<'a> {
    match line.family.as_str() {
        "astreinte" | "oncall" => return Route::OnCall,
        "aide" | "help" => return Route::Help,
        _ => {}
    }

    let Some(family) = catalog.family(&line.family) else {
        return Route::Greeting;
    };

    match line.stage.as_deref() {
        Some("form" | "formulaire") if family.name == "incident" => Route::IncidentForm,
        Some("form" | "formulaire") if family.name == "mep" => Route::MepForm,
        Some(stage) => match family.stage(stage) {
            Some(template) => Route::Template {
                family,
                stage,
                template,
            },
            None => Route::StageHelp(family),
        },
        None => Route::StageHelp(family),
    }
}

fn has_form(family: &TemplateFamily) -> bool {
    matches!(family.name.as_str(), "incident" | "mep")
}

pub fn stage_help(family: &TemplateFamily) -> String {
    let mut help = format!(
        "Étape manquante ou inconnue pour `/{}`. Étapes disponibles : {}.",
        family.name,
        family.stage_names().join(", ")
    );
    if has_form(family) {
        help.push_str(&format!(
            " Utilisez `/{} form` pour ouvrir le formulaire.",
            family.name
        ));
    }
    help
}

pub fn general_help(catalog: &TemplateCatalog) -> String {
    let mut lines = vec!["🤖 **Commandes disponibles**".to_string()];
    lines.extend(catalog.families.iter().map(|family| {
        format!(
            "• `/{} <étape>` : {}",
            family.name,
            family.stage_names().join(", ")
        )
    }));
    lines.push("• `/incident form`, `/mep form` : formulaires interactifs".to_string());
    lines.push("• `/astreinte` : personne d'astreinte aujourd'hui".to_string());
    lines.push("Paramètres optionnels : `cle=valeur` (ex. `start_time=14h00`)".to_string());
    lines.join("\n")
}

/// 填好模板，依設定回傳卡片或純文字
pub fn render_template(
    config: &AppConfig,
    family: &TemplateFamily,
    stage: &str,
    template: &Template,
    params: &HashMap<String, String>,
    now: &DateTime<Tz>,
) -> ChatReply {
    let text = truncate(
        fill_template(&template.body, &format_timestamp(now), params),
        config.max_message_length,
    );

    if config.card_replies {
        message_card(&family.name, stage, template, &text, &config.destinations)
    } else {
        ChatReply::text(text)
    }
}

pub async fn handle_message(
    state: &AppState,
    message: &Message,
    now: &DateTime<Tz>,
) -> Result<ChatReply, AppError> {
    let Some(line) = parse_message(message) else {
        return Ok(ChatReply::text(GREETING));
    };

    let catalog = state.get_templates();
    let config = state.get_config();

    let reply = match route(catalog, &line) {
        Route::Template {
            family,
            stage,
            template,
        } => {
            tracing::info!("rendering template {}.{}", family.name, stage);
            render_template(config, family, stage, template, &line.params, now)
        }
        Route::StageHelp(family) => {
            tracing::info!("missing or unknown stage for {}: {:?}", family.name, line.stage);
            ChatReply::text(stage_help(family))
        }
        Route::IncidentForm => incident_form_card(),
        Route::MepForm => mep_form_card(),
        Route::OnCall => {
            let today = now.date_naive();
            let outcome = oncall::lookup(
                state.get_grid_source(),
                today,
                &config.target_color,
                config.tolerance,
            )
            .await?;
            ChatReply::text(outcome.message(today))
        }
        Route::Help => ChatReply::text(general_help(catalog)),
        Route::Greeting => ChatReply::text(GREETING),
    };

    Ok(reply)
}
