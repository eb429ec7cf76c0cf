//! TH1D / TH1F / TH1I deserialization.
//!
//! Streamed layout (simplified):
//! ```text
//! TH1x
//!   ├─ TH1 (base)
//!   │    ├─ TNamed (name, title)
//!   │    ├─ TAttLine, TAttFill, TAttMarker (skipped via byte count)
//!   │    ├─ fNcells (i32)
//!   │    ├─ fXaxis (TAxis, with fLabels)
//!   │    ├─ fYaxis, fZaxis (skipped)
//!   │    ├─ fBarOffset, fBarWidth, fEntries, fTsumw, fTsumw2, fTsumwx, fTsumwx2
//!   │    ├─ fMaximum, fMinimum, fNormFactor
//!   │    ├─ fContour (TArrayD), fSumw2 (TArrayD)
//!   │    └─ fOption, fFunctions, fBuffer, ... (skipped via byte count)
//!   └─ TArrayD / TArrayF / TArrayI (bin contents incl. under/overflow)
//! ```

use tv_core::Histogram1D;

use super::labels::{order_labels, read_label_list};
use crate::error::{Result, RootError};
use crate::rbuffer::RBuffer;

/// Element type of the trailing content array.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ArrayKind {
    F64,
    F32,
    I32,
}

/// First TAxis version that streams fBits2 ahead of fLabels.
const TAXIS_LABELS_MIN_VERSION: u16 = 9;

struct AxisInfo {
    n_bins: usize,
    x_min: f64,
    x_max: f64,
    /// Variable-width bin edges (empty for uniform binning).
    bin_edges: Vec<f64>,
    labels: Option<Vec<String>>,
}

struct Th1Base {
    name: String,
    title: String,
    n_cells: usize,
    axis: AxisInfo,
    entries: f64,
    sumw2: Option<Vec<f64>>,
}

/// Read a one-dimensional histogram from decompressed object bytes.
pub(crate) fn read_th1(data: &[u8], kind: ArrayKind) -> Result<Histogram1D> {
    let mut r = RBuffer::new(data);

    let (version, _end) = r.read_version()?;
    if version < 1 {
        return Err(RootError::Deserialization(format!("unsupported TH1 class version: {version}")));
    }

    let base = read_th1_base(&mut r)?;

    let arr_n = r.read_u32()? as usize;
    if arr_n != base.n_cells {
        return Err(RootError::Deserialization(format!(
            "content array size {} != fNcells {}",
            arr_n, base.n_cells
        )));
    }
    let raw = match kind {
        ArrayKind::F64 => r.read_array_f64(arr_n)?,
        ArrayKind::F32 => r.read_array_f32(arr_n)?,
        ArrayKind::I32 => (0..arr_n).map(|_| r.read_i32().map(f64::from)).collect::<Result<_>>()?,
    };

    build_histogram(base, &raw)
}

fn read_th1_base(r: &mut RBuffer) -> Result<Th1Base> {
    let (th1_ver, th1_end) = r.read_version()?;

    let (name, title) = r.read_tnamed()?;

    // TAttLine, TAttFill, TAttMarker
    for _ in 0..3 {
        r.skip_versioned()?;
    }

    let n_cells = r.read_i32()?;
    if n_cells < 2 {
        return Err(RootError::Deserialization(format!("{name}: invalid fNcells {n_cells}")));
    }

    let axis = read_taxis(r)?;
    skip_taxis(r)?;
    skip_taxis(r)?;

    let _bar_offset = r.read_i16()?;
    let _bar_width = r.read_i16()?;
    let entries = r.read_f64()?;
    let _tsumw = r.read_f64()?;
    let _tsumw2 = r.read_f64()?;
    let _tsumwx = r.read_f64()?;
    let _tsumwx2 = r.read_f64()?;
    if th1_ver >= 2 {
        let _max = r.read_f64()?;
        let _min = r.read_f64()?;
    }
    if th1_ver >= 3 {
        let _norm = r.read_f64()?;
    }

    // fContour
    let contour_n = r.read_u32()? as usize;
    r.skip(contour_n * 8)?;

    let sumw2_n = r.read_u32()? as usize;
    let sumw2 = if sumw2_n > 0 { Some(r.read_array_f64(sumw2_n)?) } else { None };

    match th1_end {
        Some(end) => r.seek_checked(end)?,
        None => skip_th1_tail(r, th1_ver)?,
    }

    Ok(Th1Base { name, title, n_cells: n_cells as usize, axis, entries, sumw2 })
}

/// Walk the TH1 members after fSumw2 when no byte count is available.
fn skip_th1_tail(r: &mut RBuffer, th1_ver: u16) -> Result<()> {
    let _option = r.read_string()?;
    // fFunctions
    r.skip_versioned()?;
    if th1_ver >= 4 {
        let buf_size = r.read_i32()?;
        if buf_size > 0 {
            r.skip(1 + buf_size as usize * 8)?;
        }
    }
    if th1_ver >= 7 {
        let _err_opt = r.read_i32()?;
    }
    if th1_ver >= 8 {
        let _stat_overflows = r.read_i32()?;
    }
    Ok(())
}

fn read_taxis(r: &mut RBuffer) -> Result<AxisInfo> {
    let (version, axis_end) = r.read_version()?;

    let (name, _title) = r.read_tnamed()?;
    // TAttAxis
    r.skip_versioned()?;

    let n_bins = r.read_i32()?;
    if n_bins < 1 {
        return Err(RootError::Deserialization(format!("axis '{name}' has {n_bins} bins")));
    }
    let n_bins = n_bins as usize;
    let x_min = r.read_f64()?;
    let x_max = r.read_f64()?;

    let xbins_n = r.read_u32()? as usize;
    let bin_edges = if xbins_n > 0 { r.read_array_f64(xbins_n)? } else { Vec::new() };

    let labels = if version >= TAXIS_LABELS_MIN_VERSION {
        match read_axis_labels(r, n_bins) {
            Ok(labels) => labels,
            Err(e) if axis_end.is_some() => {
                tracing::warn!(
                    axis = %name,
                    error = %e,
                    "unreadable axis labels, using bin edges"
                );
                None
            }
            Err(e) => return Err(e),
        }
    } else {
        None
    };

    if let Some(end) = axis_end {
        r.seek_checked(end)?;
    }

    Ok(AxisInfo { n_bins, x_min, x_max, bin_edges, labels })
}

fn read_axis_labels(r: &mut RBuffer, n_bins: usize) -> Result<Option<Vec<String>>> {
    let _first = r.read_i32()?;
    let _last = r.read_i32()?;
    let _bits2 = r.read_u16()?;
    let _time_display = r.read_u8()?;
    let _time_format = r.read_string()?;

    let Some(raw) = read_label_list(r)? else {
        return Ok(None);
    };
    let labels = order_labels(raw, n_bins);
    if labels.iter().all(String::is_empty) {
        return Ok(None);
    }
    Ok(Some(labels))
}

fn skip_taxis(r: &mut RBuffer) -> Result<()> {
    let (_ver, end) = r.read_version()?;
    match end {
        Some(end) => r.seek_checked(end),
        None => Err(RootError::Deserialization("TAxis streamed without byte count".into())),
    }
}

fn build_histogram(base: Th1Base, raw: &[f64]) -> Result<Histogram1D> {
    let Th1Base { name, title, n_cells, axis, entries, sumw2 } = base;
    let n_bins = axis.n_bins;

    if n_cells != n_bins + 2 {
        return Err(RootError::Deserialization(format!(
            "{name}: fNcells {n_cells} does not match a 1D axis of {n_bins} bins"
        )));
    }

    // [underflow, bin1, ..., binN, overflow]
    let bin_content = raw[1..=n_bins].to_vec();
    let sumw2 = sumw2.filter(|w| w.len() == n_cells).map(|w| w[1..=n_bins].to_vec());

    let bin_edges = if axis.bin_edges.len() == n_bins + 1 {
        axis.bin_edges
    } else {
        let width = (axis.x_max - axis.x_min) / n_bins as f64;
        (0..=n_bins).map(|i| axis.x_min + i as f64 * width).collect()
    };

    Ok(Histogram1D {
        name,
        title,
        bin_edges,
        bin_content,
        sumw2,
        labels: axis.labels,
        entries: Some(entries),
    })
}
