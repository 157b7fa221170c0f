//! Audio fixture generators
//!
//! Short WAV files with an ID3v2 tag, FLAC and Ogg Vorbis files carrying
//! Vorbis comments, and zip archives of them. Also compiled into the
//! integration tests through `tests/helpers`.

use lofty::config::WriteOptions;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::tag::{Accessor, Tag, TagType};
use std::io::{Cursor, Write};

/// Tags written into a generated WAV fixture
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureTags {
    pub title: Option<&'static str>,
    pub album: Option<&'static str>,
    pub track: Option<u32>,
    pub disc: Option<u32>,
}

/// Generate a tagged mono WAV file and return its bytes
pub fn tagged_wav(tags: &FixtureTags) -> Vec<u8> {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("fixture.wav");

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&path, spec).expect("Failed to create WAV");
    // 0.25 s of a 200 Hz square-ish tone
    for i in 0..2000u32 {
        let sample = if (i / 20) % 2 == 0 { 8000 } else { -8000 };
        writer.write_sample(sample as i16).expect("Failed to write sample");
    }
    writer.finalize().expect("Failed to finalize WAV");

    let mut tag = Tag::new(TagType::Id3v2);
    if let Some(title) = tags.title {
        tag.set_title(title.to_string());
    }
    if let Some(album) = tags.album {
        tag.set_album(album.to_string());
    }
    if let Some(track) = tags.track {
        tag.set_track(track);
    }
    if let Some(disc) = tags.disc {
        tag.set_disk(disc);
    }

    let mut tagged_file = lofty::probe::Probe::open(&path)
        .expect("Failed to open fixture")
        .read()
        .expect("Failed to read fixture");
    tagged_file.insert_tag(tag);
    tagged_file
        .save_to_path(&path, WriteOptions::default())
        .expect("Failed to save tags");

    std::fs::read(&path).expect("Failed to read fixture bytes")
}

/// Vorbis comment list as raw `KEY=value` pairs, written verbatim
pub type Comments<'a> = &'a [(&'a str, &'a str)];

/// Vorbis comment body: vendor string, count, then length-prefixed entries
fn comment_body(comments: Comments) -> Vec<u8> {
    let vendor = b"mcat fixtures";
    let mut body = Vec::new();
    body.extend_from_slice(&(vendor.len() as u32).to_le_bytes());
    body.extend_from_slice(vendor);
    body.extend_from_slice(&(comments.len() as u32).to_le_bytes());
    for (key, value) in comments {
        let entry = format!("{}={}", key, value);
        body.extend_from_slice(&(entry.len() as u32).to_le_bytes());
        body.extend_from_slice(entry.as_bytes());
    }
    body
}

/// Minimal stereo 44.1 kHz FLAC stream with a VORBIS_COMMENT block
pub fn flac_with_comments(comments: Comments) -> Vec<u8> {
    let mut bytes = b"fLaC".to_vec();

    // STREAMINFO: block sizes, unknown frame sizes, packed rate/channels/bps/samples, md5
    bytes.push(0x00);
    bytes.extend_from_slice(&34u32.to_be_bytes()[1..]);
    bytes.extend_from_slice(&4096u16.to_be_bytes());
    bytes.extend_from_slice(&4096u16.to_be_bytes());
    bytes.extend_from_slice(&[0; 6]);
    let packed: u64 = (44_100 << 44) | (1 << 41) | (15 << 36) | 44_100;
    bytes.extend_from_slice(&packed.to_be_bytes());
    bytes.extend_from_slice(&[0; 16]);

    let body = comment_body(comments);
    bytes.push(0x80 | 0x04);
    bytes.extend_from_slice(&(body.len() as u32).to_be_bytes()[1..]);
    bytes.extend_from_slice(&body);

    // Stand-in for frame data; never decoded
    bytes.extend_from_slice(&[0; 32]);
    bytes
}

/// Minimal three-page Ogg Vorbis stream with the given comments
pub fn ogg_vorbis_with_comments(comments: Comments) -> Vec<u8> {
    let mut ident = b"\x01vorbis".to_vec();
    ident.extend_from_slice(&0u32.to_le_bytes());
    ident.push(2);
    ident.extend_from_slice(&44_100u32.to_le_bytes());
    ident.extend_from_slice(&0i32.to_le_bytes());
    ident.extend_from_slice(&128_000i32.to_le_bytes());
    ident.extend_from_slice(&0i32.to_le_bytes());
    ident.push(0xB8);
    ident.push(0x01);

    let mut comment = b"\x03vorbis".to_vec();
    comment.extend_from_slice(&comment_body(comments));
    comment.push(0x01);

    let mut setup = b"\x05vorbis".to_vec();
    setup.extend_from_slice(&[0; 16]);

    let audio = [0u8; 8];

    let mut bytes = ogg_page(0x02, 0, 0, &[ident.as_slice()]);
    bytes.extend(ogg_page(0x00, 0, 1, &[comment.as_slice(), setup.as_slice()]));
    bytes.extend(ogg_page(0x04, 44_100, 2, &[audio.as_slice()]));
    bytes
}

/// One Ogg page holding whole `packets`, checksum filled in
fn ogg_page(header_type: u8, granule: u64, sequence: u32, packets: &[&[u8]]) -> Vec<u8> {
    let mut lacing = Vec::new();
    for packet in packets {
        lacing.extend(std::iter::repeat(255u8).take(packet.len() / 255));
        lacing.push((packet.len() % 255) as u8);
    }

    let mut page = b"OggS".to_vec();
    page.push(0);
    page.push(header_type);
    page.extend_from_slice(&granule.to_le_bytes());
    page.extend_from_slice(&0x6D63_6174u32.to_le_bytes());
    page.extend_from_slice(&sequence.to_le_bytes());
    page.extend_from_slice(&[0; 4]);
    page.push(lacing.len() as u8);
    page.extend_from_slice(&lacing);
    for packet in packets {
        page.extend_from_slice(packet);
    }

    let crc = ogg_crc(&page);
    page[22..26].copy_from_slice(&crc.to_le_bytes());
    page
}

/// CRC-32 as used by Ogg: polynomial 0x04C11DB7, no reflection, zero init
fn ogg_crc(data: &[u8]) -> u32 {
    let mut crc = 0u32;
    for &byte in data {
        crc ^= (byte as u32) << 24;
        for _ in 0..8 {
            crc = if crc & 0x8000_0000 != 0 {
                (crc << 1) ^ 0x04C1_1DB7
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// Build a zip archive holding `entries` in order
pub fn zip_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);
    for (name, data) in entries {
        writer.start_file(*name, options).expect("Failed to start entry");
        writer.write_all(data).expect("Failed to write entry");
    }
    writer.finish().expect("Failed to finish archive").into_inner()
}
