//! Host platform capabilities
//!
//! The runner only branches on the host in two places: which libraries to link and how to delete the executable.
//! Both are answered here, once, from a small closed set of platforms.

use std::fmt;
use std::path::Path;

use crate::runner::process::CommandLine;

/// Libraries linked on POSIX hosts.
const POSIX_LINK_FLAGS: &[&str] = &["-lpthread", "-lm", "-lcurl"];
/// Libraries linked everywhere else.
const MATH_ONLY_LINK_FLAGS: &[&str] = &["-lm"];

/// Host platform family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Linux, macOS and other Unix-likes
    Posix,
    /// Windows
    WindowsLike,
    /// Anything else; builds work but automatic cleanup does not
    Unsupported,
}

impl Platform {
    /// Detect the platform this binary was compiled for.
    pub fn host() -> Self {
        if cfg!(unix) {
            Platform::Posix
        } else if cfg!(windows) {
            Platform::WindowsLike
        } else {
            Platform::Unsupported
        }
    }

    /// Link flags appended to every compiler invocation.
    pub fn link_flags(&self) -> &'static [&'static str] {
        match self {
            Platform::Posix => POSIX_LINK_FLAGS,
            Platform::WindowsLike | Platform::Unsupported => MATH_ONLY_LINK_FLAGS,
        }
    }

    /// File name of the executable produced for a source stem.
    ///
    /// The Windows toolchain appends `.exe` when the `-o` path has no extension, so the runner has to name that file
    /// explicitly to run and delete it.
    pub fn executable_name(&self, stem: &str) -> String {
        match self {
            Platform::WindowsLike => format!("{stem}.exe"),
            Platform::Posix | Platform::Unsupported => stem.to_string(),
        }
    }

    /// Command that force-deletes `path`, or `None` when this platform has no known delete command.
    pub fn cleanup_command(&self, path: &Path) -> Option<CommandLine> {
        match self {
            Platform::Posix => Some(CommandLine::new("rm").arg("-f").arg(path.to_string_lossy())),
            Platform::WindowsLike => {
                // `del` is a cmd builtin and only understands backslashes
                let native = path.to_string_lossy().replace('/', "\\");
                Some(
                    CommandLine::new("cmd")
                        .args(["/C", "del", "/F", "/Q"])
                        .arg(native),
                )
            }
            Platform::Unsupported => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::Posix => "posix",
            Platform::WindowsLike => "windows",
            Platform::Unsupported => "unsupported",
        };
        write!(f, "{name}")
    }
}
