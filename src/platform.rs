//! Host classification, resolved once at startup.

/// Family of the host operating system, as far as path conventions and
/// per-user data directories are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostFamily {
    /// Linux, macOS, the BSDs, Cygwin.
    Unix,
    Windows,
    Unsupported,
}

impl HostFamily {
    pub fn current() -> Self {
        if cfg!(windows) {
            HostFamily::Windows
        } else if cfg!(unix) {
            HostFamily::Unix
        } else {
            HostFamily::Unsupported
        }
    }
}

/// Which TeX distribution's tooling to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TexDistribution {
    MikTex,
    TexLive,
}

impl TexDistribution {
    /// Guess the distribution from the host.
    ///
    /// This is an approximation: every Windows host is treated as MikTeX and
    /// everything else as a TeX Live style installation. A Windows TeX Live
    /// install will be misclassified.
    pub fn for_host(host: HostFamily) -> Self {
        match host {
            HostFamily::Windows => TexDistribution::MikTex,
            HostFamily::Unix | HostFamily::Unsupported => TexDistribution::TexLive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub host: HostFamily,
    pub distribution: TexDistribution,
}

impl Platform {
    pub fn detect() -> Self {
        Self::for_host(HostFamily::current())
    }

    pub fn for_host(host: HostFamily) -> Self {
        Self {
            host,
            distribution: TexDistribution::for_host(host),
        }
    }

    pub fn is_miktex(&self) -> bool {
        self.distribution == TexDistribution::MikTex
    }
}
