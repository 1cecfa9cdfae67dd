mod ffmpeg_command;
mod ffprobe_info;
mod gpu_probe;
mod path_validator;
mod timecode;
mod video_scanner;

pub use ffmpeg_command::GpuFrameCommand;
pub use ffprobe_info::{VideoMetadata, get_video_info, parse_frame_rate, parse_probe_output};
pub use gpu_probe::has_accelerated_decoder;
pub use path_validator::{contact_sheet_output_path, ensure_directory_exists, validate_path_exists};
pub use timecode::{format_duration_minutes, format_size_mib, format_timecode};
pub use video_scanner::scan_video_files;
