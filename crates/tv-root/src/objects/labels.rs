//! Alphanumeric axis labels (`TAxis::fLabels`).
//!
//! Labels are stored as a `THashList` of `TObjString`s. Each string's
//! `fUniqueID` holds the 1-based bin number it names.

use crate::error::{Result, RootError};
use crate::rbuffer::{ObjectHeader, RBuffer};

/// One label as streamed: `(bin number, text)`.
pub(crate) type RawLabel = (u32, String);

/// Read the `fLabels` pointer member of a TAxis.
///
/// Returns `None` for a null pointer.
pub(crate) fn read_label_list(r: &mut RBuffer) -> Result<Option<Vec<RawLabel>>> {
    let end = match r.read_object_header()? {
        ObjectHeader::Null => return Ok(None),
        ObjectHeader::NewClass { class_name, end } => {
            if class_name != "THashList" && class_name != "TList" {
                return Err(RootError::UnsupportedClass(class_name));
            }
            end
        }
        ObjectHeader::ClassRef { end, .. } => end,
        ObjectHeader::ObjectRef(tag) => {
            return Err(RootError::Deserialization(format!(
                "axis labels refer to earlier object at {tag}"
            )));
        }
    };

    let labels = read_tlist_body(r)?;
    if let Some(end) = end {
        r.seek_checked(end)?;
    }
    Ok(Some(labels))
}

fn read_tlist_body(r: &mut RBuffer) -> Result<Vec<RawLabel>> {
    let (version, end) = r.read_version()?;
    if version > 3 {
        r.read_tobject()?;
        let _name = r.read_string()?;
    }
    let n_objects = r.read_i32()?;
    if n_objects < 0 {
        return Err(RootError::Deserialization(format!("negative list size {n_objects}")));
    }

    let mut labels = Vec::with_capacity((n_objects as usize).min(r.remaining()));
    for _ in 0..n_objects {
        match r.read_object_header()? {
            ObjectHeader::NewClass { end, .. } | ObjectHeader::ClassRef { end, .. } => {
                labels.push(read_tobjstring(r)?);
                if let Some(end) = end {
                    r.seek_checked(end)?;
                }
            }
            ObjectHeader::Null => {}
            ObjectHeader::ObjectRef(tag) => {
                return Err(RootError::Deserialization(format!(
                    "label list refers to earlier object at {tag}"
                )));
            }
        }

        // per-entry draw option
        let nch = r.read_u8()?;
        let len =
            if version > 4 && nch == 255 { r.read_i32()?.max(0) as usize } else { nch as usize };
        r.skip(len)?;
    }

    if let Some(end) = end {
        r.seek_checked(end)?;
    }
    Ok(labels)
}

fn read_tobjstring(r: &mut RBuffer) -> Result<RawLabel> {
    let (_ver, end) = r.read_version()?;
    let (unique_id, _bits) = r.read_tobject()?;
    let text = r.read_string()?;
    if let Some(end) = end {
        r.seek_checked(end)?;
    }
    Ok((unique_id, text))
}

/// Place streamed labels into bin order for an axis with `n_bins` bins.
///
/// Labels whose bin number is out of range are dropped.
pub(crate) fn order_labels(raw: Vec<RawLabel>, n_bins: usize) -> Vec<String> {
    let mut out = vec![String::new(); n_bins];
    for (bin, text) in raw {
        let bin = bin as usize;
        if (1..=n_bins).contains(&bin) {
            out[bin - 1] = text;
        }
    }
    out
}
