use crate::model::ShiftTemplate;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct TemplateInfo {
    pub template: ShiftTemplate,
    pub path: PathBuf,
    pub modified: Option<DateTime<Utc>>,
}

/// Gestion simple des templates persistés sur disque (un JSON par template).
#[derive(Debug, Clone)]
pub struct TemplateStore {
    base_dir: PathBuf,
}

impl TemplateStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            base_dir: dir.as_ref().to_path_buf(),
        }
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.base_dir)
            .with_context(|| format!("creating template directory {}", self.base_dir.display()))
    }

    pub fn save(&self, template: &ShiftTemplate) -> Result<PathBuf> {
        template.validate()?;
        self.ensure_dir()?;
        let path = self.base_dir.join(format!("{}.json", template.id.as_str()));
        let json = serde_json::to_string_pretty(template)?;
        fs::write(&path, json).with_context(|| format!("writing template {}", path.display()))?;
        Ok(path)
    }

    pub fn load(&self, id: &str) -> Result<ShiftTemplate> {
        let path = self.base_dir.join(format!("{id}.json"));
        let data =
            fs::read(&path).with_context(|| format!("reading template {}", path.display()))?;
        let template: ShiftTemplate = serde_json::from_slice(&data)
            .with_context(|| format!("parsing template {}", path.display()))?;
        template.validate()?;
        Ok(template)
    }

    pub fn list(&self) -> Result<Vec<TemplateInfo>> {
        if !self.base_dir.exists() {
            return Ok(Vec::new());
        }
        let mut infos = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let data = fs::read(&path)?;
            let template: ShiftTemplate = match serde_json::from_slice(&data) {
                Ok(t) => t,
                Err(err) => {
                    eprintln!("Warning: could not parse template {}: {err}", path.display());
                    continue;
                }
            };
            let modified = entry
                .metadata()
                .and_then(|meta| meta.modified())
                .ok()
                .map(DateTime::<Utc>::from);
            infos.push(TemplateInfo {
                template,
                path,
                modified,
            });
        }
        infos.sort_by(|a, b| a.template.id.as_str().cmp(b.template.id.as_str()));
        Ok(infos)
    }
}

pub fn export_template_json<P: AsRef<Path>>(path: P, template: &ShiftTemplate) -> Result<()> {
    let json = serde_json::to_string_pretty(template)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn load_template_from_file<P: AsRef<Path>>(path: P) -> Result<ShiftTemplate> {
    let data = fs::read(&path)?;
    let template: ShiftTemplate = serde_json::from_slice(&data)?;
    template.validate()?;
    Ok(template)
}
