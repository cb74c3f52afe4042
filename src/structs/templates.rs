use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Template {
    pub title: String,
    pub emoji: String,
    #[serde(default = "default_priority")]
    pub priority: Priority,
    #[serde(rename = "template")]
    pub body: String,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

fn default_priority() -> Priority {
    Priority::Medium
}

impl Priority {
    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "Priorité haute",
            Priority::Medium => "Priorité moyenne",
            Priority::Low => "Priorité basse",
        }
    }
}

/// 同一指令下的各個階段，保留定義順序
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateFamily {
    pub name: String,
    pub stages: Vec<(String, Template)>,
}

impl TemplateFamily {
    pub fn stage(&self, stage: &str) -> Option<&Template> {
        self.stages
            .iter()
            .find(|(name, _)| name == stage)
            .map(|(_, template)| template)
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|(name, _)| name.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TemplateCatalog {
    pub families: Vec<TemplateFamily>,
}

impl TemplateCatalog {
    pub fn family(&self, name: &str) -> Option<&TemplateFamily> {
        self.families.iter().find(|family| family.name == name)
    }
}

fn template(title: &str, emoji: &str, priority: Priority, body: &str) -> Template {
    Template {
        title: title.to_string(),
        emoji: emoji.to_string(),
        priority,
        body: body.to_string(),
    }
}

impl TemplateCatalog {
    /// 內建的事故 / MEP 訊息模板
    pub fn builtin() -> Self {
        let incident = TemplateFamily {
            name: "incident".to_string(),
            stages: vec![
                (
                    "detection".to_string(),
                    template(
                        "Incident détecté",
                        "🚨",
                        Priority::High,
                        "📢 **INCIDENT DÉTECTÉ**\n\n\
                         ⚠️ Nous avons détecté un incident sur nos services.\n\n\
                         🔍 **Statut**: Investigation en cours\n\
                         ⏰ **Heure de détection**: {timestamp}\n\
                         👥 **Équipes mobilisées**: Équipe technique\n\n\
                         📊 Nous vous tiendrons informés de l'évolution de la situation.",
                    ),
                ),
                (
                    "investigation".to_string(),
                    template(
                        "Investigation en cours",
                        "🔍",
                        Priority::Medium,
                        "🔍 **MISE À JOUR - INVESTIGATION**\n\n\
                         📋 **Statut**: Investigation en cours\n\
                         ⏰ **Dernière mise à jour**: {timestamp}\n\n\
                         🛠️ **Actions en cours**:\n\
                         • Analyse des logs système\n\
                         • Identification de la cause racine\n\
                         • Mobilisation des équipes techniques\n\n\
                         ⏳ Prochaine mise à jour prévue dans 30 minutes.",
                    ),
                ),
                (
                    "resolution".to_string(),
                    template(
                        "Incident résolu",
                        "✅",
                        Priority::Low,
                        "✅ **INCIDENT RÉSOLU**\n\n\
                         🎉 L'incident a été résolu avec succès.\n\n\
                         📊 **Résumé**:\n\
                         • ⏰ Début: {start_time}\n\
                         • ⏰ Fin: {timestamp}\n\
                         • 🛠️ Cause: [À compléter]\n\
                         • 🔧 Solution: [À compléter]\n\n\
                         📈 Tous les services sont maintenant opérationnels.\n\n\
                         📋 Un rapport post-mortem sera publié dans les 48h.",
                    ),
                ),
            ],
        };

        let mep = TemplateFamily {
            name: "mep".to_string(),
            stages: vec![
                (
                    "planned".to_string(),
                    template(
                        "MEP planifiée",
                        "📅",
                        Priority::Medium,
                        "📅 **MISE EN PRODUCTION PLANIFIÉE**\n\n\
                         🚀 Une nouvelle version sera déployée.\n\n\
                         📋 **Détails**:\n\
                         • ⏰ **Date prévue**: {deployment_date}\n\
                         • ⏳ **Durée estimée**: 30 minutes\n\
                         • 🎯 **Impact**: Interruption de service possible\n\n\
                         ✨ **Nouveautés**:\n\
                         • [À compléter - nouvelles fonctionnalités]\n\
                         • [À compléter - corrections de bugs]\n\n\
                         🔔 Nous vous préviendrons du début et de la fin de la maintenance.",
                    ),
                ),
                (
                    "started".to_string(),
                    template(
                        "Déploiement en cours",
                        "🚀",
                        Priority::High,
                        "🚀 **DÉPLOIEMENT EN COURS**\n\n\
                         ⚙️ La mise en production a commencé.\n\n\
                         📊 **Statut**:\n\
                         • ⏰ **Début**: {timestamp}\n\
                         • 🎯 **Progression**: Déploiement en cours\n\
                         • ⏳ **Fin estimée**: {end_time}\n\n\
                         ⚠️ Les services peuvent être temporairement indisponibles.\n\n\
                         📱 Suivez cette conversation pour les mises à jour.",
                    ),
                ),
                (
                    "completed".to_string(),
                    template(
                        "Déploiement terminé",
                        "✅",
                        Priority::Low,
                        "✅ **DÉPLOIEMENT TERMINÉ**\n\n\
                         🎉 La mise en production s'est déroulée avec succès !\n\n\
                         📊 **Résumé**:\n\
                         • ⏰ **Début**: {start_time}\n\
                         • ⏰ **Fin**: {timestamp}\n\
                         • ✅ **Statut**: Succès\n\n\
                         🌟 **Nouveautés disponibles**:\n\
                         • [À compléter - nouvelles fonctionnalités]\n\n\
                         📈 Tous les services sont opérationnels.",
                    ),
                ),
            ],
        };

        TemplateCatalog {
            families: vec![incident, mep],
        }
    }
}
