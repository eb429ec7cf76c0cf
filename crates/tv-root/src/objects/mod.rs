//! ROOT object deserialization dispatch.

mod labels;
mod th1;

use tv_core::Histogram1D;

use crate::error::{Result, RootError};

/// Read a histogram from a decompressed object payload, given its class name.
pub fn read_histogram(payload: &[u8], class_name: &str) -> Result<Histogram1D> {
    match class_name {
        "TH1D" => th1::read_th1(payload, th1::ArrayKind::F64),
        "TH1F" => th1::read_th1(payload, th1::ArrayKind::F32),
        "TH1I" => th1::read_th1(payload, th1::ArrayKind::I32),
        _ => Err(RootError::UnsupportedClass(class_name.to_string())),
    }
}
