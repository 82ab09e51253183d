// SPDX-License-Identifier: GPL-3.0-only

//! PipeWire camera enumeration and format detection
//!
//! Camera discovery and format enumeration using PipeWire. PipeWire
//! handles device access and format negotiation internally; discovery
//! goes through `pw-cli` with a default-camera fallback.

use super::super::types::{CameraDevice, CameraFormat, Framerate};
use crate::constants::formats;
use tracing::{debug, info, warn};

/// Enumerate cameras using PipeWire
/// Returns list of available cameras discovered through PipeWire
pub fn enumerate_pipewire_cameras() -> Option<Vec<CameraDevice>> {
    debug!("Attempting to enumerate cameras via PipeWire");

    if gstreamer::init().is_err() {
        warn!("GStreamer init failed");
        return None;
    }

    if gstreamer::ElementFactory::make("pipewiresrc")
        .build()
        .is_err()
    {
        debug!("pipewiresrc not available");
        return None;
    }

    if let Some(cameras) = try_enumerate_with_pw_cli() {
        debug!(count = cameras.len(), "Found PipeWire cameras");
        return Some(cameras);
    }

    // Fallback: let PipeWire use its default camera
    info!("Using PipeWire auto-selection (default camera)");
    Some(vec![CameraDevice {
        name: "Default Camera (PipeWire)".to_string(),
        path: String::new(), // Empty path = PipeWire auto-selects
        node_id: None,
        camera_location: None,
    }])
}

/// Properties collected for one PipeWire node while parsing `pw-cli ls`
#[derive(Default)]
struct NodeProps {
    id: Option<String>,
    serial: Option<String>,
    name: Option<String>,
    location: Option<String>,
    is_video_source: bool,
}

impl NodeProps {
    fn into_device(self) -> Option<CameraDevice> {
        if !self.is_video_source {
            return None;
        }
        let (id, name) = (self.id?, self.name?);

        // Prefer object.serial for target-object, fall back to node ID
        let path = match &self.serial {
            Some(serial) => format!("pipewire-serial-{}", serial),
            None => format!("pipewire-{}", id),
        };

        debug!(id = %id, serial = ?self.serial, name = %name, path = %path, "Found video camera");
        Some(CameraDevice {
            name,
            path,
            node_id: Some(id),
            camera_location: self.location,
        })
    }
}

/// Try to enumerate cameras using the pw-cli command
fn try_enumerate_with_pw_cli() -> Option<Vec<CameraDevice>> {
    debug!("Trying pw-cli for camera enumeration");

    let output = std::process::Command::new("pw-cli")
        .args(["ls", "Node"])
        .output()
        .ok()?;

    if !output.status.success() {
        debug!("pw-cli command failed");
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut cameras = Vec::new();
    let mut current = NodeProps::default();

    for line in stdout.lines() {
        let trimmed = line.trim();

        // New node header (format: "id 76, type PipeWire:Interface:Node/3")
        if trimmed.starts_with("id ") && trimmed.contains("type PipeWire:Interface:Node") {
            if let Some(device) = std::mem::take(&mut current).into_device() {
                cameras.push(device);
            }

            if let Some(id_str) = trimmed.strip_prefix("id ")
                && let Some(id_num) = id_str.split(',').next()
            {
                current.id = Some(id_num.trim().to_string());
            }
        }

        // media.class = "Video/Source" marks a camera node
        if trimmed.contains("media.class") && trimmed.contains("\"Video/Source\"") {
            current.is_video_source = true;
        }

        // object.serial = "2146" — used for the pipewiresrc target-object
        if trimmed.contains("object.serial")
            && let Some(value) = extract_quoted_value(trimmed)
        {
            current.serial = Some(value);
        }

        // node.description = "Laptop Webcam Module (V4L2)"
        if trimmed.contains("node.description")
            && let Some(value) = extract_quoted_value(trimmed)
        {
            current.name = Some(value);
        }

        // api.libcamera.location = "front" | "back" | "external"
        if trimmed.contains("api.libcamera.location")
            && let Some(value) = extract_quoted_value(trimmed)
        {
            current.location = Some(value);
        }
    }

    // Don't forget the last node
    if let Some(device) = current.into_device() {
        cameras.push(device);
    }

    if cameras.is_empty() {
        debug!("No cameras found via pw-cli");
        None
    } else {
        debug!(count = cameras.len(), "Enumerated cameras via pw-cli");
        Some(cameras)
    }
}

/// Extract quoted value from a property line (e.g., 'property = "value"' -> "value")
fn extract_quoted_value(line: &str) -> Option<String> {
    let start = line.find('"')?;
    let end = line[start + 1..].find('"')?;
    Some(line[start + 1..start + 1 + end].to_string())
}

/// Get supported formats for a PipeWire camera
///
/// Queries supported formats from PipeWire using `pw-cli enum-params` on
/// the device's node, falling back to a list of common formats when the
/// query fails.
pub fn get_pipewire_formats(device: &CameraDevice) -> Vec<CameraFormat> {
    debug!(device_path = %device.path, "Getting PipeWire formats");

    if let Some(node_id) = device.node_id.as_deref() {
        if let Some(formats) = try_enumerate_formats_from_node(node_id) {
            info!(count = formats.len(), node_id = %node_id, "Enumerated formats via pw-cli");
            return formats;
        }
        warn!(node_id = %node_id, "Failed to enumerate formats from node, using fallback");
    }

    get_fallback_formats()
}

/// Fallback formats when PipeWire enumeration fails
fn get_fallback_formats() -> Vec<CameraFormat> {
    let mut result = Vec::new();
    for &(width, height) in formats::FALLBACK_RESOLUTIONS {
        for &fps in formats::COMMON_FRAMERATES {
            result.push(CameraFormat {
                width,
                height,
                framerate: Some(Framerate::from_int(fps)),
                pixel_format: "YUY2".to_string(),
            });
        }
    }
    result
}

/// Try to enumerate formats from a PipeWire node using pw-cli
fn try_enumerate_formats_from_node(node_id: &str) -> Option<Vec<CameraFormat>> {
    debug!(node_id, "Enumerating formats via pw-cli enum-params");

    let output = std::process::Command::new("pw-cli")
        .args(["enum-params", node_id, "EnumFormat"])
        .output()
        .ok()?;

    if !output.status.success() {
        debug!("pw-cli enum-params failed");
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Some(parse_enum_format_output(&stdout)).filter(|f| !f.is_empty())
}

/// Parse the output of `pw-cli enum-params <node> EnumFormat`
fn parse_enum_format_output(stdout: &str) -> Vec<CameraFormat> {
    let mut formats = Vec::new();
    let mut current_width: Option<u32> = None;
    let mut current_height: Option<u32> = None;
    let mut current_framerates: Vec<Framerate> = Vec::new();
    let mut current_subtype: Option<String> = None;
    let mut current_video_format: Option<String> = None;

    let mut flush = |width: &mut Option<u32>,
                     height: &mut Option<u32>,
                     framerates: &mut Vec<Framerate>,
                     subtype: &mut Option<String>,
                     video_format: &mut Option<String>| {
        if let (Some(w), Some(h), Some(sub)) = (*width, *height, subtype.as_ref()) {
            // Raw formats carry the VideoFormat string; compressed ones
            // are named by their media subtype (MJPG, H264)
            let pixel_format = if sub == "raw" {
                video_format.clone().unwrap_or_else(|| "YUY2".to_string())
            } else {
                sub.to_uppercase()
            };

            if framerates.is_empty() {
                // libcamera nodes expose no framerates via EnumFormat;
                // let the graph negotiate one
                formats.push(CameraFormat {
                    width: w,
                    height: h,
                    framerate: None,
                    pixel_format,
                });
            } else {
                for fps in framerates.iter() {
                    formats.push(CameraFormat {
                        width: w,
                        height: h,
                        framerate: Some(*fps),
                        pixel_format: pixel_format.clone(),
                    });
                }
            }
        }
        *width = None;
        *height = None;
        framerates.clear();
        *subtype = None;
        *video_format = None;
    };

    for line in stdout.lines() {
        let trimmed = line.trim();

        // Id 1   (Spa:Enum:MediaSubtype:raw)
        if trimmed.contains("Spa:Enum:MediaSubtype:")
            && let Some(subtype_start) = trimmed.rfind(':')
        {
            let subtype = trimmed[subtype_start + 1..].trim_end_matches(')');
            current_subtype = Some(subtype.to_lowercase());
        }

        // Id 4   (Spa:Enum:VideoFormat:YUY2)
        if trimmed.contains("Spa:Enum:VideoFormat:")
            && let Some(format_start) = trimmed.rfind(':')
        {
            let video_format = trimmed[format_start + 1..].trim_end_matches(')');
            current_video_format = Some(video_format.to_uppercase());
        }

        // Rectangle 1920x1080
        if trimmed.starts_with("Rectangle ")
            && let Some(res_str) = trimmed.strip_prefix("Rectangle ")
            && let Some((w_str, h_str)) = res_str.split_once('x')
        {
            current_width = w_str.parse().ok();
            current_height = h_str.parse().ok();
        }

        // Fraction 60/1 or Fraction 60000/1001
        if trimmed.starts_with("Fraction ")
            && let Some(frac_str) = trimmed.strip_prefix("Fraction ")
            && let Some((num_str, denom_str)) = frac_str.split_once('/')
            && let (Ok(num), Ok(denom)) = (num_str.parse::<u32>(), denom_str.parse::<u32>())
            && denom > 0
        {
            let fps = Framerate::new(num, denom);
            // Deduplicate by integer fps (60000/1001 and 60/1 both ~ 60fps)
            if !current_framerates
                .iter()
                .any(|f| f.as_int() == fps.as_int())
            {
                current_framerates.push(fps);
            }
        }

        // A new Object closes the previous format group
        if trimmed.starts_with("Object:") {
            flush(
                &mut current_width,
                &mut current_height,
                &mut current_framerates,
                &mut current_subtype,
                &mut current_video_format,
            );
        }
    }

    // Don't forget the last format group
    flush(
        &mut current_width,
        &mut current_height,
        &mut current_framerates,
        &mut current_subtype,
        &mut current_video_format,
    );

    formats
}

/// Test if PipeWire is available and working
pub fn is_pipewire_available() -> bool {
    if gstreamer::init().is_err() {
        return false;
    }

    gstreamer::ElementFactory::make("pipewiresrc")
        .build()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_quoted_value() {
        assert_eq!(
            extract_quoted_value("node.description = \"Integrated Camera\""),
            Some("Integrated Camera".to_string())
        );
        assert_eq!(extract_quoted_value("no quotes here"), None);
    }

    #[test]
    fn test_parse_enum_format_raw() {
        let output = "\
  Object: size 224, type Spa:Pod:Object:Param:Format (262147), id Spa:Enum:ParamId:EnumFormat (3)
    Prop: key Spa:Pod:Object:Param:Format:mediaSubtype (2), flags 00000000
      Id 1   (Spa:Enum:MediaSubtype:raw)
    Prop: key Spa:Pod:Object:Param:Format:VideoFormat (131073), flags 00000000
      Id 4   (Spa:Enum:VideoFormat:YUY2)
    Prop: key Spa:Pod:Object:Param:Format:VideoSize (131075), flags 00000000
      Rectangle 1280x720
    Prop: key Spa:Pod:Object:Param:Format:VideoFramerate (131076), flags 00000000
      Fraction 30/1
";
        let formats = parse_enum_format_output(output);
        assert_eq!(formats.len(), 1);
        assert_eq!(formats[0].width, 1280);
        assert_eq!(formats[0].height, 720);
        assert_eq!(formats[0].pixel_format, "YUY2");
        assert_eq!(formats[0].framerate, Some(Framerate::from_int(30)));
    }

    #[test]
    fn test_parse_enum_format_no_framerate() {
        let output = "\
  Object: size 128, type Spa:Pod:Object:Param:Format (262147), id Spa:Enum:ParamId:EnumFormat (3)
      Id 1   (Spa:Enum:MediaSubtype:raw)
      Id 8   (Spa:Enum:VideoFormat:NV12)
      Rectangle 1920x1080
";
        let formats = parse_enum_format_output(output);
        assert_eq!(formats.len(), 1);
        assert_eq!(formats[0].framerate, None);
        assert_eq!(formats[0].pixel_format, "NV12");
    }

    #[test]
    fn test_fallback_formats_not_empty() {
        let formats = get_fallback_formats();
        assert!(!formats.is_empty());
        assert!(formats.iter().all(|f| f.framerate.is_some()));
    }
}
