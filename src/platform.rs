//! Vector instruction sets the build was compiled for.
//!
//! Purely diagnostic: the sweep prints this before the first measurement so
//! timings can be read against the code generation that produced them.

use std::io::{self, Write};

struct VectorExtension {
    message: &'static str,
    enabled: bool,
}

const EXTENSIONS: [VectorExtension; 4] = [
    VectorExtension {
        message: "SSE enabled",
        enabled: cfg!(target_feature = "sse2"),
    },
    VectorExtension {
        message: "AVX enabled",
        enabled: cfg!(target_feature = "avx"),
    },
    VectorExtension {
        message: "AVX-512 enabled",
        enabled: cfg!(target_feature = "avx512f"),
    },
    VectorExtension {
        message: "NEON enabled (ARM)",
        enabled: cfg!(target_feature = "neon"),
    },
];

/// Messages for every extension enabled at compile time.
pub fn enabled_extensions() -> Vec<&'static str> {
    EXTENSIONS
        .iter()
        .filter(|ext| ext.enabled)
        .map(|ext| ext.message)
        .collect()
}

/// Writes one line per enabled extension, or a fallback line if none are.
pub fn write_summary<W: Write>(sink: &mut W) -> io::Result<()> {
    let enabled = enabled_extensions();
    if enabled.is_empty() {
        writeln!(sink, "No SIMD vectorization")?;
    }
    for message in enabled {
        writeln!(sink, "{message}")?;
    }
    Ok(())
}
