//! Object paths inside the input files and names of the files written.

use std::path::{Component, Path, PathBuf};

use tv_core::{ObjectKind, TriggerLevel};
use tv_viz_render::output::OutputFormat;

/// Inclusive distribution of one object kind, e.g. `RecoJets/General/JetMult`.
pub fn general_histogram(kind: ObjectKind) -> String {
    format!("{}/General/{}", kind.directory(), kind.histogram())
}

/// Distribution of one object kind for events passing `label`,
/// e.g. `RecoJets/L1/JetMult_L1_SingleJet36`.
pub fn path_histogram(kind: ObjectKind, level: TriggerLevel, label: &str) -> String {
    format!("{}/{}/{}_{}", kind.directory(), level.as_str(), kind.histogram(), label)
}

/// Histogram name: the last component of its object path.
pub fn histogram_name(object_path: &str) -> &str {
    object_path.rsplit('/').next().unwrap_or(object_path)
}

/// Legend label for an input file: the leading directory of a relative path
/// (`run123/validation.root` gives `run123`), otherwise the file stem.
pub fn dataset_label(path: &Path) -> String {
    let mut components = path.components();
    if let (Some(Component::Normal(first)), Some(_)) = (components.next(), components.next()) {
        return first.to_string_lossy().into_owned();
    }
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// `<dir>/<stem>.<ext>` for an image.
pub fn image_file(dir: &Path, stem: &str, format: OutputFormat) -> PathBuf {
    dir.join(format!("{stem}.{}", format.extension()))
}
