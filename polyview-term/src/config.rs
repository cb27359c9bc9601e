/// Command-line configuration, parsed by hand
use std::path::PathBuf;
use std::str::FromStr;

use polyview_core::ColorScheme;
use thiserror::Error;

pub const USAGE: &str = "\
polyview - compare legacy VTK polydata meshes side by side

Usage: polyview [OPTIONS] <file.vtk>...

Options:
  -o, --outfile <file.png>   write a PNG instead of opening the viewer
  -s, --size <N>             picture tile size (N x N) [default: 800]
  -a, --angle <DEG>          camera transformation angle [default: 90]
  -C, --camera <SPEC>        camera azimuth, elevation, roll (e.g. aer)
  -c, --color-scheme <NAME>  default, bw or wb [default: default]
  -f, --fiber                render polylines as 3D tubes
  -r, --rotations            use a different rotation for each tile
  -b, --box                  draw the bounding box around each object
  -x, --offscreen            render without a terminal preview
  -m, --multiview            render each file in a separate viewport
      --separation <N>       combi-view translation magnitude [default: 45]
  -h, --help                 print this message
";

/// Largest accepted --size; keeps the pixel arithmetic of a four-tile
/// window inside u32.
pub const MAX_TILE_SIZE: u32 = 16_384;

/// Flag-level errors, all fatal before any mesh is read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown flag `{0}`")]
    UnknownFlag(String),

    #[error("flag `{0}` expects a value")]
    MissingValue(String),

    #[error("invalid value `{value}` for `{flag}`")]
    InvalidValue { flag: String, value: String },

    #[error("no input files given")]
    NoInputFiles,

    #[error("at most 4 input files can be displayed, got {0}")]
    TooManyFiles(usize),

    #[error("combi-view not supported for more than 2 files, got {0} (try --multiview)")]
    CombiOverflow(usize),
}

/// Immutable run configuration. Parsed once, then passed by reference
/// into every component entry point.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub inputs: Vec<PathBuf>,
    pub outfile: Option<PathBuf>,
    pub size: u32,
    pub angle: f32,
    pub camera: Option<String>,
    pub scheme: ColorScheme,
    pub fiber: bool,
    pub rotations: bool,
    pub outline: bool,
    pub offscreen: bool,
    pub multiview: bool,
    pub separation: i32,
    pub help: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            outfile: None,
            size: 800,
            angle: 90.0,
            camera: None,
            scheme: ColorScheme::Default,
            fiber: false,
            rotations: false,
            outline: false,
            offscreen: false,
            multiview: false,
            separation: 45,
            help: false,
        }
    }
}

impl Config {
    /// Parse the arguments after the program name.
    pub fn parse<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Config::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => config.help = true,
                "-o" | "--outfile" => {
                    config.outfile = Some(PathBuf::from(value(&mut args, &arg)?));
                }
                "-s" | "--size" => config.size = parsed(&mut args, &arg)?,
                "-a" | "--angle" => config.angle = parsed(&mut args, &arg)?,
                "-C" | "--camera" => config.camera = Some(value(&mut args, &arg)?),
                "-c" | "--color-scheme" => config.scheme = parsed(&mut args, &arg)?,
                "-f" | "--fiber" => config.fiber = true,
                "-r" | "--rotations" => config.rotations = true,
                "-b" | "--box" => config.outline = true,
                "-x" | "--offscreen" => config.offscreen = true,
                "-m" | "--multiview" => config.multiview = true,
                "--separation" => config.separation = parsed(&mut args, &arg)?,
                flag if flag.starts_with('-') && flag.len() > 1 => {
                    return Err(ConfigError::UnknownFlag(flag.to_string()));
                }
                _ => config.inputs.push(PathBuf::from(arg)),
            }
        }
        Ok(config)
    }

    /// Reject bad flag combinations before any mesh or render work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let count = self.inputs.len();
        if count == 0 {
            return Err(ConfigError::NoInputFiles);
        }
        if count > 4 {
            return Err(ConfigError::TooManyFiles(count));
        }
        if !self.multiview && count > 2 {
            return Err(ConfigError::CombiOverflow(count));
        }
        if self.size == 0 || self.size > MAX_TILE_SIZE {
            return Err(ConfigError::InvalidValue {
                flag: "--size".into(),
                value: self.size.to_string(),
            });
        }
        Ok(())
    }
}

fn value(
    args: &mut impl Iterator<Item = String>,
    flag: &str,
) -> Result<String, ConfigError> {
    args.next()
        .ok_or_else(|| ConfigError::MissingValue(flag.to_string()))
}

fn parsed<T: FromStr>(
    args: &mut impl Iterator<Item = String>,
    flag: &str,
) -> Result<T, ConfigError> {
    let raw = value(args, flag)?;
    raw.parse().map_err(|_| ConfigError::InvalidValue {
        flag: flag.to_string(),
        value: raw,
    })
}
