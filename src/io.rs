//! On-disk container for sequences of detection records.
//!
//! Layout: 4-byte magic `HOAD`, little-endian `u32` format version, then
//! length-delimited wire messages until end of file. Per-frame files carry
//! exactly one record in the same framing; per-video files carry the whole
//! frame list in order.

use anyhow::{anyhow, bail, Context, Result};
use prost::bytes::Buf;
use prost::Message;
use std::fs;
use std::path::Path;

use crate::raw;
use crate::release;

const MAGIC: [u8; 4] = *b"HOAD";
const VERSION: u32 = 1;

/// Frame a record sequence into a versioned byte blob.
pub fn encode_records<M: Message>(records: &[M]) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(
        MAGIC.len() + 4 + records.iter().map(|r| r.encoded_len() + 5).sum::<usize>(),
    );
    buf.extend_from_slice(&MAGIC);
    buf.extend_from_slice(&VERSION.to_le_bytes());
    for record in records {
        record.encode_length_delimited(&mut buf)?;
    }
    Ok(buf)
}

/// Decode a versioned blob back into its record sequence, preserving order.
pub fn decode_records<M: Message + Default>(data: &[u8]) -> Result<Vec<M>> {
    if data.len() < MAGIC.len() + 4 {
        bail!("container too short: {} bytes", data.len());
    }
    if data[..4] != MAGIC {
        bail!("not a detection container: bad magic");
    }
    let version = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
    if version != VERSION {
        bail!(
            "unsupported container version {} (supported: {})",
            version,
            VERSION
        );
    }

    let mut body = &data[8..];
    let mut records = Vec::new();
    while body.has_remaining() {
        let record = M::decode_length_delimited(&mut body)
            .map_err(|e| anyhow!("corrupt record {} in container: {}", records.len(), e))?;
        records.push(record);
    }
    Ok(records)
}

/// Load a per-video raw detection file.
pub fn load_raw_detections(path: &Path) -> Result<Vec<raw::FrameDetections>> {
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    decode_records::<raw::wire::Detections>(&data)
        .with_context(|| format!("decoding {}", path.display()))?
        .into_iter()
        .map(raw::FrameDetections::try_from)
        .collect()
}

/// Load a per-frame raw detection file containing exactly one record.
pub fn load_raw_frame_detections(path: &Path) -> Result<raw::FrameDetections> {
    let frames = load_raw_detections(path)?;
    single_record(frames, path)
}

/// Write a per-video raw detection file, preserving record order.
pub fn save_raw_detections(path: &Path, detections: &[raw::FrameDetections]) -> Result<()> {
    let wire: Vec<raw::wire::Detections> = detections.iter().map(Into::into).collect();
    let data = encode_records(&wire)?;
    fs::write(path, data).with_context(|| format!("writing {}", path.display()))
}

/// Load a per-video releasable detection file.
pub fn load_release_detections(path: &Path) -> Result<Vec<release::FrameDetections>> {
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    decode_records::<release::wire::Detections>(&data)
        .with_context(|| format!("decoding {}", path.display()))?
        .into_iter()
        .map(release::FrameDetections::try_from)
        .collect()
}

/// Write a per-video releasable detection file, preserving record order.
pub fn save_release_detections(
    path: &Path,
    detections: &[release::FrameDetections],
) -> Result<()> {
    let wire: Vec<release::wire::Detections> = detections.iter().map(Into::into).collect();
    let data = encode_records(&wire)?;
    fs::write(path, data).with_context(|| format!("writing {}", path.display()))
}

fn single_record<T>(mut records: Vec<T>, path: &Path) -> Result<T> {
    if records.len() != 1 {
        bail!(
            "{}: expected exactly one record, got {}",
            path.display(),
            records.len()
        );
    }
    Ok(records.remove(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::wire::Detections;

    fn sample(frame_number: u32) -> Detections {
        Detections {
            video_id: "P01_101".to_string(),
            frame_number,
            objects: vec![],
            hands: vec![],
        }
    }

    #[test]
    fn encode_decode_round_trip_preserves_order() {
        let records = vec![sample(3), sample(1), sample(2)];
        let blob = encode_records(&records).unwrap();
        let decoded: Vec<Detections> = decode_records(&blob).unwrap();
        assert_eq!(decoded, records);
    }

    #[test]
    fn empty_sequence_round_trips() {
        let blob = encode_records::<Detections>(&[]).unwrap();
        let decoded: Vec<Detections> = decode_records(&blob).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn bad_magic_is_rejected() {
        let mut blob = encode_records(&[sample(1)]).unwrap();
        blob[0] = b'X';
        let err = decode_records::<Detections>(&blob).unwrap_err();
        assert!(err.to_string().contains("magic"));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let mut blob = encode_records(&[sample(1)]).unwrap();
        blob[4] = 0xFF;
        let err = decode_records::<Detections>(&blob).unwrap_err();
        assert!(err.to_string().contains("version"));
    }

    #[test]
    fn truncated_record_is_rejected() {
        let blob = encode_records(&[sample(1)]).unwrap();
        let err = decode_records::<Detections>(&blob[..blob.len() - 2]).unwrap_err();
        assert!(err.to_string().contains("corrupt record 0"));
    }
}
