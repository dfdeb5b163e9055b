use crate::errors::{AppError, AppResult};
use crate::model::NodeJson;
use crate::tree::Tree;
use serde::de::Error as _;
use serde_json::Value;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;
use tracing::info;

pub fn to_json_string(tree: &Tree) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(&tree.to_json())?)
}

pub fn from_json_str(text: &str) -> AppResult<Tree> {
    parse_document(serde_json::from_str(text)?)
}

fn parse_document(value: Value) -> AppResult<Tree> {
    ensure_objects(&value)?;
    let json: NodeJson = serde_json::from_value(value)?;
    Tree::from_json(json)
}

// serde would also take a node in its sequence form, so every level must
// be checked to be an object before deserializing.
fn ensure_objects(value: &Value) -> Result<(), serde_json::Error> {
    let Some(node) = value.as_object() else {
        return Err(serde_json::Error::custom("every node must be a JSON object"));
    };
    match node.get("children") {
        Some(Value::Array(children)) => children.iter().try_for_each(ensure_objects),
        _ => Ok(()),
    }
}

/// Loads a mind map from a JSON file. A missing file yields a fresh
/// single-root map.
pub fn load_map(path: &Path) -> AppResult<Tree> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "no map file yet, starting fresh");
            return Ok(Tree::default());
        }
        Err(err) => return Err(AppError::io(path, err)),
    };

    let tree = parse_document(serde_json::from_reader(BufReader::new(file))?)?;
    info!(path = %path.display(), nodes = tree.node_count(), "map loaded");
    Ok(tree)
}

/// Saves a mind map as pretty-printed JSON, creating parent directories.
pub fn save_map(tree: &Tree, path: &Path) -> AppResult<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|err| AppError::io(dir, err))?;
    }

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|err| AppError::io(path, err))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &tree.to_json())?;
    writer.flush().map_err(|err| AppError::io(path, err))?;

    info!(path = %path.display(), nodes = tree.node_count(), "map saved");
    Ok(())
}
