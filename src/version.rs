use std::fmt;

/// Firmware version triple. All zeroes means "not given on the command line".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VersionInfo {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
}

impl VersionInfo {
    pub fn new(major: u32, minor: u32, build: u32) -> Self {
        Self { major, minor, build }
    }

    pub fn is_unset(&self) -> bool {
        self.major == 0 && self.minor == 0 && self.build == 0
    }

    /// Resolve the version to embed in the firmware.
    ///
    /// Explicit values win as soon as any of them is non-zero. Otherwise the
    /// numbers are guessed from a `git describe` string, in this order:
    ///
    /// 1. split on `-`
    /// 2. with 4+ segments and a numeric 3rd segment, that is the build
    /// 3. else with 2+ segments and a numeric 2nd segment, that is the build
    /// 4. split the 1st segment on `.`: numeric parts become major, then minor
    ///
    /// Anything that does not parse stays 0.
    pub fn resolve(explicit: VersionInfo, describe: &str) -> VersionInfo {
        if !explicit.is_unset() {
            return explicit;
        }

        let mut version = explicit;
        let segments: Vec<&str> = describe.split('-').collect();

        if let Some(build) = segments.get(2).filter(|_| segments.len() > 3).and_then(|s| parse_number(s)) {
            version.build = build;
        } else if let Some(build) = segments.get(1).and_then(|s| parse_number(s)) {
            version.build = build;
        }

        let mut parts = segments[0].split('.');
        if let Some(major) = parts.next().and_then(parse_number) {
            version.major = major;
        }
        if let Some(minor) = parts.next().and_then(parse_number) {
            version.minor = minor;
        }

        version
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.build)
    }
}

fn parse_number(segment: &str) -> Option<u32> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}
