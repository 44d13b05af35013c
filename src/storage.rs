use crate::model::Snapshot;
use crate::roster::Roster;
use anyhow::Context;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub trait Storage {
    /// Charge l'instantané d'entrées depuis un support.
    fn load(&self) -> anyhow::Result<Snapshot>;
    /// Sauvegarde de manière atomique.
    fn save(&self, snapshot: &Snapshot) -> anyhow::Result<()>;
}

pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> anyhow::Result<Snapshot> {
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let snapshot: Snapshot =
            serde_json::from_slice(&data).with_context(|| "parsing snapshot.json")?;
        Ok(snapshot)
    }

    fn save(&self, snapshot: &Snapshot) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(snapshot)?;
        write_atomic(&self.path, &json)
    }
}

/// Charge un roster généré depuis un fichier JSON.
pub fn load_roster<P: AsRef<Path>>(path: P) -> anyhow::Result<Roster> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let roster: Roster = serde_json::from_slice(&data).with_context(|| "parsing roster.json")?;
    Ok(roster)
}

/// Sauvegarde atomique d'un roster (le cycle de vie passe par réécriture
/// complète du fichier, jamais par mutation partielle).
pub fn save_roster<P: AsRef<Path>>(path: P, roster: &Roster) -> anyhow::Result<()> {
    let json = serde_json::to_vec_pretty(roster)?;
    write_atomic(path.as_ref(), &json)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let mut tmp = NamedTempFile::new_in(path.parent().unwrap_or_else(|| Path::new(".")))
        .with_context(|| "creating temp file")?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).with_context(|| "atomic rename")?;
    Ok(())
}
