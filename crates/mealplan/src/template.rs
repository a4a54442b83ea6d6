use std::sync::Arc;

use mealcal_shared::{
    Error, KeyValueStore, Result,
    mealplan::Template,
    read_json, write_json,
};
use time::Date;

use crate::Planner;

pub const TEMPLATE_KEY: &str = "meal_calendar_templates";

/// Named weekly lunch patterns kept in local storage.
///
/// Every mutation re-reads the stored list, applies the change and writes it
/// back, so a second writer sharing the store is not clobbered wholesale.
/// Two writers racing between read and write can still lose one update.
pub struct TemplateLibrary {
    store: Arc<dyn KeyValueStore>,
    templates: Vec<Template>,
}

impl TemplateLibrary {
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let templates = read_json(store.as_ref(), TEMPLATE_KEY)
            .await?
            .unwrap_or_default();

        Ok(Self { store, templates })
    }

    pub fn list(&self) -> &[Template] {
        &self.templates
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        let name = name.trim();
        self.templates.iter().find(|t| t.name == name)
    }

    /// Captures the lunches of the week holding `week_start` under `name`.
    /// An existing template with the same name is replaced.
    pub async fn save(
        &mut self,
        name: &str,
        planner: &Planner,
        week_start: Date,
    ) -> Result<Template> {
        let name = name.trim();
        if name.is_empty() {
            mealcal_shared::bail!("template name is required");
        }

        let items = planner.capture_week(week_start);
        if items.is_empty() {
            mealcal_shared::bail!("week has no lunches to save as a template");
        }

        let template = Template {
            name: name.to_owned(),
            items,
        };

        let mut templates = self.read_current().await?;
        templates.retain(|t| t.name != template.name);
        templates.push(template.clone());
        self.write(templates).await?;

        tracing::info!(template = %template.name, items = template.items.len(), "template saved");

        Ok(template)
    }

    pub async fn delete(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        let mut templates = self.read_current().await?;
        let before = templates.len();
        templates.retain(|t| t.name != name);

        if templates.len() == before {
            return Err(Error::NotFound(format!("template `{name}`")));
        }

        self.write(templates).await?;
        tracing::info!(template = name, "template deleted");

        Ok(())
    }

    /// Replaces the lunches of the week holding `week_start` with the named
    /// template. Destructive: callers confirm with the user first.
    pub async fn apply(&mut self, name: &str, planner: &mut Planner, week_start: Date) -> Result<()> {
        self.templates = self.read_current().await?;

        let template = self
            .get(name)
            .ok_or_else(|| Error::NotFound(format!("template `{}`", name.trim())))?;

        planner.apply_template(template, week_start)
    }

    async fn read_current(&self) -> Result<Vec<Template>> {
        Ok(read_json(self.store.as_ref(), TEMPLATE_KEY)
            .await?
            .unwrap_or_default())
    }

    async fn write(&mut self, templates: Vec<Template>) -> Result<()> {
        write_json(self.store.as_ref(), TEMPLATE_KEY, &templates).await?;
        self.templates = templates;

        Ok(())
    }
}
