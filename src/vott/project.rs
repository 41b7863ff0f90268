//! VoTT project descriptor (`.vott`) schema and assembler.
//!
//! Project settings either come from generated defaults or are cloned from an
//! existing template project. In both cases the asset registry, tag list and
//! `lastVisitedAssetId` are rebuilt from scratch on every run.

use std::path::Path;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{Map, Value};

use super::asset::Asset;
use super::ids::{AssetId, ConnectionId, IdGenerator};
use super::VOTT_SCHEMA_VERSION;

pub const LOCAL_FILE_SYSTEM_PROVIDER: &str = "localFileSystemProxy";

/// Keys owned by the assembler; template values under these keys are discarded.
const REBUILT_KEYS: [&str; 3] = ["assets", "tags", "lastVisitedAssetId"];

/// A tag with its display color.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub name: String,
    pub color: String,
}

/// Generated project settings, in VoTT's own key order.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    pub name: String,
    pub source_connection: Connection,
    pub target_connection: Connection,
    pub video_settings: VideoSettings,
    pub use_security_token: bool,
    pub security_token: String,
    pub id: ConnectionId,
    pub active_learning_settings: ActiveLearningSettings,
    pub export_format: ExportFormat,
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub name: String,
    pub provider_type: String,
    pub provider_options: ProviderOptions,
    pub id: ConnectionId,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderOptions {
    pub folder_path: String,
    pub relative_path: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSettings {
    pub frame_extraction_rate: u32,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            frame_extraction_rate: 15,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveLearningSettings {
    pub auto_detect: bool,
    pub predict_tag: bool,
    pub model_path_type: String,
}

impl Default for ActiveLearningSettings {
    fn default() -> Self {
        Self {
            auto_detect: false,
            predict_tag: true,
            model_path_type: "coco".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFormat {
    pub provider_type: String,
    pub provider_options: ExportProviderOptions,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportProviderOptions {
    pub asset_state: String,
    pub include_images: bool,
}

impl Default for ExportFormat {
    fn default() -> Self {
        Self {
            provider_type: "vottJson".to_string(),
            provider_options: ExportProviderOptions {
                asset_state: "visited".to_string(),
                include_images: true,
            },
        }
    }
}

impl ProjectSettings {
    /// Settings for a fresh project reading images from `images_dir` and
    /// storing its files in `output_dir`.
    pub fn generate(
        name: &str,
        images_dir: &Path,
        output_dir: &Path,
        ids: &mut IdGenerator,
    ) -> Self {
        let source_connection = Connection::local(format!("{name}Source"), images_dir, ids);
        let target_connection = Connection::local(format!("{name}Target"), output_dir, ids);

        Self {
            name: name.to_string(),
            source_connection,
            target_connection,
            video_settings: VideoSettings::default(),
            use_security_token: false,
            security_token: String::new(),
            id: ids.connection_id(),
            active_learning_settings: ActiveLearningSettings::default(),
            export_format: ExportFormat::default(),
            version: VOTT_SCHEMA_VERSION.to_string(),
        }
    }
}

impl Connection {
    fn local(name: String, folder: &Path, ids: &mut IdGenerator) -> Self {
        Self {
            name,
            provider_type: LOCAL_FILE_SYSTEM_PROVIDER.to_string(),
            provider_options: ProviderOptions {
                folder_path: folder.to_string_lossy().to_string(),
                relative_path: true,
            },
            id: ids.connection_id(),
        }
    }
}

/// Where the project-level settings come from.
#[derive(Clone, Debug)]
pub enum ProjectBase {
    /// Settings synthesized from scratch.
    Generated(ProjectSettings),
    /// Top-level object of an existing `.vott` file, kept verbatim apart from
    /// the rebuilt keys.
    Template(Map<String, Value>),
}

impl ProjectBase {
    pub fn generate_defaults(
        name: &str,
        images_dir: &Path,
        output_dir: &Path,
        ids: &mut IdGenerator,
    ) -> Self {
        ProjectBase::Generated(ProjectSettings::generate(name, images_dir, output_dir, ids))
    }

    /// Use a parsed template object, optionally renaming the project.
    pub fn with_template(mut template: Map<String, Value>, name: Option<&str>) -> Self {
        template.retain(|key, _| !REBUILT_KEYS.contains(&key.as_str()));
        if let Some(name) = name {
            template.insert("name".to_string(), Value::String(name.to_string()));
        }
        ProjectBase::Template(template)
    }

    /// Project name recorded in the settings, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            ProjectBase::Generated(settings) => Some(&settings.name),
            ProjectBase::Template(map) => map.get("name").and_then(Value::as_str),
        }
    }
}

/// The complete `.vott` document.
#[derive(Clone, Debug)]
pub struct ProjectDescriptor {
    pub base: ProjectBase,
    /// Registered in production order; serialized as an id-keyed object.
    pub assets: Vec<Asset>,
    pub tags: Vec<Tag>,
    pub last_visited_asset_id: Option<AssetId>,
}

impl ProjectDescriptor {
    /// Attach colored tags and the asset registry to `base`.
    ///
    /// The first asset becomes the last visited one.
    pub fn assemble(
        base: ProjectBase,
        tag_names: &[String],
        assets: Vec<Asset>,
        ids: &mut IdGenerator,
    ) -> Self {
        let tags = tag_names
            .iter()
            .map(|name| Tag {
                name: name.clone(),
                color: ids.tag_color(),
            })
            .collect();
        let last_visited_asset_id = assets.first().map(|asset| asset.id.clone());

        Self {
            base,
            assets,
            tags,
            last_visited_asset_id,
        }
    }
}

impl Serialize for ProjectDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let settings = match &self.base {
            ProjectBase::Generated(settings) => match serde_json::to_value(settings) {
                Ok(Value::Object(map)) => map,
                Ok(_) => Map::new(),
                Err(err) => return Err(serde::ser::Error::custom(err)),
            },
            ProjectBase::Template(map) => map.clone(),
        };

        let mut map = serializer.serialize_map(None)?;
        for (key, value) in settings
            .iter()
            .filter(|(key, _)| !REBUILT_KEYS.contains(&key.as_str()))
        {
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry("assets", &AssetRegistry(&self.assets))?;
        map.serialize_entry("tags", &self.tags)?;
        if let Some(id) = &self.last_visited_asset_id {
            map.serialize_entry("lastVisitedAssetId", id)?;
        }
        map.end()
    }
}

struct AssetRegistry<'a>(&'a [Asset]);

impl Serialize for AssetRegistry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|asset| (&asset.id, asset)))
    }
}
