use tracing::{info, instrument};

use crate::size_and_align::{AbiAndPrefAlign, Size};

/// The fixed target this back end compiles for.
///
/// There is no generic "pick a backend" step: the crate exists to carry
/// `loongarch64-unknown-linux-gnu`'s ABI-relevant constants (integer
/// alignments, pointer width, stack alignment) to the code generator.
#[derive(Debug)]
pub struct LoongArch64Target {
    pub data_layout: TargetDataLayout,
    pub triple: TargetTriple,
}

impl LoongArch64Target {
    pub fn new() -> Self {
        LoongArch64Target {
            data_layout: TargetDataLayout::new(),
            triple: TargetTriple::new("loongarch64", "unknown", "linux", "gnu"),
        }
    }
}

impl Default for LoongArch64Target {
    fn default() -> Self {
        Self::new()
    }
}

/// Describes the target platform's data layout: alignment requirements for
/// each integer width, pointer size, and the stack alignment the ABI
/// mandates at call boundaries.
#[derive(Debug)]
pub struct TargetDataLayout {
    pub endianess: Endianess,

    pub bool_align: AbiAndPrefAlign,
    pub char_align: AbiAndPrefAlign,
    pub short_align: AbiAndPrefAlign,
    pub int_align: AbiAndPrefAlign,
    pub long_align: AbiAndPrefAlign,

    /// The size of pointers in bytes.
    pub pointer_size: Size,
    pub pointer_align: AbiAndPrefAlign,

    /// The mandatory alignment of the stack pointer at a `bl` call site.
    pub stack_align: AbiAndPrefAlign,
}

impl Default for TargetDataLayout {
    fn default() -> Self {
        TargetDataLayout {
            endianess: Endianess::Little,
            bool_align: AbiAndPrefAlign::new(8, 8),
            char_align: AbiAndPrefAlign::new(8, 8),
            short_align: AbiAndPrefAlign::new(16, 16),
            int_align: AbiAndPrefAlign::new(32, 32),
            long_align: AbiAndPrefAlign::new(64, 64),
            pointer_size: Size::from_bits(64u64),
            pointer_align: AbiAndPrefAlign::new(64, 64),
            stack_align: AbiAndPrefAlign::new(128, 128),
        }
    }
}

impl TargetDataLayout {
    #[instrument]
    pub fn new() -> Self {
        let data_layout = TargetDataLayout::default();
        info!("target data layout: {:?}", data_layout);
        data_layout
    }
}

/// LoongArch64 is little-endian; this exists mainly so the field reads the
/// same way a multi-target ABI description would read it.
#[derive(Debug, PartialEq, Eq)]
pub enum Endianess {
    Little,
    Big,
}

/// `ARCHITECTURE-VENDOR-OPERATING_SYSTEM-ENVIRONMENT`, e.g.
/// `loongarch64-unknown-linux-gnu`.
#[derive(Debug)]
pub struct TargetTriple {
    pub arch: String,
    pub vendor: String,
    pub os: String,
    pub env: String,
}

impl TargetTriple {
    pub fn new(arch: &str, vendor: &str, os: &str, env: &str) -> Self {
        TargetTriple {
            arch: arch.to_string(),
            vendor: vendor.to_string(),
            os: os.to_string(),
            env: env.to_string(),
        }
    }

    pub fn as_str(&self) -> String {
        format!("{}-{}-{}-{}", self.arch, self.vendor, self.os, self.env)
    }
}
