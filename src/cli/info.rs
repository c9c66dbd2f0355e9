use anyhow::Result;
use bitflags::Flags;
use serde::Serialize;

use super::command::{Cli, InfoArgs};
use super::load_input;
use edid::Edid;
use edid::structs::cea::CeaExtension;
use edid::structs::data_block::DataBlock;

pub fn cmd_info(args: &InfoArgs, cli: &Cli) -> Result<()> {
    log::info!("Analyzing EDID: {}", args.input.display());

    let edid = load_input(&args.input, cli)?;
    if !edid.is_valid() {
        log::warn!("Missing EDID header, reporting sentinel values");
    }

    print!("{}", serde_yaml_ng::to_string(&EdidReport::from_edid(&edid))?);

    Ok(())
}

#[derive(Debug, Serialize)]
pub struct EdidReport {
    valid: bool,
    manufacturer: String,
    product_code: String,
    serial: u32,
    week: u8,
    year: u16,
    version: String,
    digital: bool,
    color_depth: String,
    bits_per_color: u8,
    video_interface: String,
    screen_size_cm: Size,
    preferred_resolution: Size,
    segments: u16,
    extensions: Vec<ExtensionInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cea: Option<CeaInfo>,
    capabilities: Capabilities,
}

#[derive(Debug, Serialize)]
struct Size {
    width: u16,
    height: u16,
}

#[derive(Debug, Serialize)]
struct ExtensionInfo {
    segment: usize,
    tag: String,
}

#[derive(Debug, Serialize)]
struct CeaInfo {
    version: u8,
    dtd_start: u8,
    data_blocks: Vec<DataBlockInfo>,
}

#[derive(Debug, Serialize)]
struct DataBlockInfo {
    offset: usize,
    kind: String,
    length: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    registration_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    extended_tag: Option<u8>,
}

#[derive(Debug, Serialize)]
struct Capabilities {
    color_depths: Vec<&'static str>,
    color_format: String,
    digital_display_types: Vec<&'static str>,
    color_formats: Vec<&'static str>,
    color_spaces: Vec<&'static str>,
    timings: Vec<u8>,
    audio_formats: Vec<&'static str>,
}

impl EdidReport {
    pub fn from_edid(edid: &Edid) -> Self {
        let mut timings = Vec::new();
        edid.supported_timings(&mut timings);

        Self {
            valid: edid.is_valid(),
            manufacturer: edid.manufacturer(),
            product_code: format!("{:04X}", edid.product_code()),
            serial: edid.serial(),
            week: edid.week(),
            year: edid.year(),
            version: format!("{}.{}", edid.version_major(), edid.version_minor()),
            digital: edid.is_digital(),
            color_depth: edid.color_depth().to_string(),
            bits_per_color: edid.bits_per_color(),
            video_interface: edid.video_interface().to_string(),
            screen_size_cm: Size {
                width: edid.width_in_centimeters() as u16,
                height: edid.height_in_centimeters() as u16,
            },
            preferred_resolution: Size {
                width: edid.preferred_width_in_pixels(),
                height: edid.preferred_height_in_pixels(),
            },
            segments: edid.segments(),
            extensions: edid
                .extensions()
                .enumerate()
                .map(|(index, block)| ExtensionInfo {
                    segment: index + 1,
                    tag: format!("{:02X}", block.tag()),
                })
                .collect(),
            cea: edid.cea_extension().map(CeaInfo::from_extension),
            capabilities: Capabilities {
                color_depths: flag_names(edid.supported_color_depths()),
                color_format: edid.supported_color_format().to_string(),
                digital_display_types: flag_names(edid.supported_digital_display_types()),
                color_formats: flag_names(edid.supported_color_formats()),
                color_spaces: flag_names(edid.supported_color_space()),
                timings,
                audio_formats: flag_names(edid.supported_audio_formats()),
            },
        }
    }
}

impl CeaInfo {
    fn from_extension(cea: CeaExtension<'_>) -> Self {
        Self {
            version: cea.version(),
            dtd_start: cea.detailed_timing_descriptor_start(),
            data_blocks: cea.data_blocks().map(DataBlockInfo::from_record).collect(),
        }
    }
}

impl DataBlockInfo {
    fn from_record(record: DataBlock<'_>) -> Self {
        Self {
            offset: record.offset(),
            kind: record.kind().to_string(),
            length: record.size(),
            registration_id: record.registration_id().map(|id| format!("{id:06X}")),
            extended_tag: record.extended_tag(),
        }
    }
}

fn flag_names<F: Flags>(flags: F) -> Vec<&'static str> {
    flags.iter_names().map(|(name, _)| name).collect()
}

#[test]
fn example_report() {
    use edid::process::{EXAMPLE_DATA, load::Loader};

    let edid = Loader::default().load(EXAMPLE_DATA).unwrap();

    let report = EdidReport::from_edid(&edid);
    let yaml = serde_yaml_ng::to_string(&report).unwrap();

    assert!(yaml.contains("manufacturer: SAM"));
    assert!(yaml.contains("video_interface: HDMI-a"));
    assert!(yaml.contains("- DOLBY_ATMOS"));
    assert_eq!(report.product_code, "0F10");
    assert_eq!(report.capabilities.timings, [16, 4, 31, 19, 5, 20, 97, 93]);
    assert_eq!(
        report.capabilities.color_formats,
        ["RGB", "YCBCR_444", "YCBCR_420"]
    );

    let cea = report.cea.unwrap();
    assert_eq!(cea.data_blocks.len(), 8);
    assert_eq!(cea.data_blocks[3].registration_id.as_deref(), Some("000C03"));
    assert_eq!(cea.data_blocks[4].registration_id.as_deref(), Some("C45DD8"));
    assert_eq!(cea.data_blocks[6].extended_tag, Some(0x05));
}

#[test]
fn invalid_report() {
    let report = EdidReport::from_edid(&Edid::default());

    assert!(!report.valid);
    assert_eq!(report.product_code, "FFFF");
    assert_eq!(report.segments, 1);
    assert!(report.extensions.is_empty());
    assert!(report.cea.is_none());
    assert!(report.capabilities.color_formats.is_empty());

    let yaml = serde_yaml_ng::to_string(&report).unwrap();
    assert!(!yaml.contains("cea:"));
}
