//! Linux memory figures from /proc and sysfs
//!
//! - /proc/meminfo for the memory-status snapshot
//! - /sys/devices/system/memory for installed (hot-pluggable block) memory

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::platform::{MemoryStatus, QueryError, QueryResult};

const MEMINFO_PATH: &str = "/proc/meminfo";
const MEMORY_BLOCKS_DIR: &str = "/sys/devices/system/memory";

/// Fields of /proc/meminfo needed for a snapshot, in bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Meminfo {
    pub mem_total: u64,
    pub mem_free: u64,
    pub mem_available: Option<u64>,
    pub buffers: u64,
    pub cached: u64,
    pub swap_total: u64,
    pub swap_free: u64,
    pub vmalloc_total: u64,
    pub vmalloc_used: u64,
}

impl Meminfo {
    /// Parse the contents of /proc/meminfo.
    pub fn parse(content: &str) -> QueryResult<Self> {
        let mut info = Meminfo::default();
        let mut saw_total = false;

        for line in content.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = parse_kb_value(value.trim());

            match key.trim() {
                "MemTotal" => {
                    info.mem_total = value;
                    saw_total = true;
                }
                "MemFree" => info.mem_free = value,
                "MemAvailable" => info.mem_available = Some(value),
                "Buffers" => info.buffers = value,
                "Cached" => info.cached = value,
                "SwapTotal" => info.swap_total = value,
                "SwapFree" => info.swap_free = value,
                "VmallocTotal" => info.vmalloc_total = value,
                "VmallocUsed" => info.vmalloc_used = value,
                _ => {}
            }
        }

        if !saw_total || info.mem_total == 0 {
            return Err(QueryError::NotFound("MemTotal in /proc/meminfo".into()));
        }
        Ok(info)
    }

    /// Available memory; older kernels lack MemAvailable.
    pub fn available(&self) -> u64 {
        self.mem_available
            .unwrap_or(self.mem_free + self.buffers + self.cached)
            .min(self.mem_total)
    }

    /// Percentage of physical memory in use, truncated.
    pub fn memory_load(&self) -> u32 {
        if self.mem_total == 0 {
            return 0;
        }
        let used = self.mem_total.saturating_sub(self.available());
        ((used as u128 * 100) / self.mem_total as u128) as u32
    }

    /// Map onto the platform snapshot. The page file is RAM plus swap, like
    /// the Windows commit limit.
    pub fn to_status(&self) -> MemoryStatus {
        let available = self.available();
        MemoryStatus {
            memory_load: self.memory_load(),
            total_physical: self.mem_total,
            available_physical: available,
            total_page_file: self.mem_total + self.swap_total,
            available_page_file: available + self.swap_free,
            total_virtual: self.vmalloc_total,
            available_virtual: self.vmalloc_total.saturating_sub(self.vmalloc_used),
            available_extended_virtual: 0,
        }
    }
}

/// Parse a "1234 kB" value into bytes.
fn parse_kb_value(value: &str) -> u64 {
    value
        .split_whitespace()
        .next()
        .and_then(|kb| kb.parse::<u64>().ok())
        .unwrap_or(0)
        .saturating_mul(1024)
}

/// Read a fresh snapshot from /proc/meminfo.
pub fn read_memory_status() -> QueryResult<MemoryStatus> {
    let content = fs::read_to_string(MEMINFO_PATH)?;
    Ok(Meminfo::parse(&content)?.to_status())
}

/// Installed memory in kilobytes, summed over all memory blocks.
pub fn read_installed_memory_kb() -> QueryResult<u64> {
    installed_memory_kb_in(Path::new(MEMORY_BLOCKS_DIR))
}

/// Offline blocks are still installed hardware, so they are counted too.
fn installed_memory_kb_in(dir: &Path) -> QueryResult<u64> {
    let block_size = parse_block_size(&fs::read_to_string(dir.join("block_size_bytes"))?)?;

    let mut blocks = 0u64;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let is_block = name
            .to_str()
            .and_then(|n| n.strip_prefix("memory"))
            .is_some_and(|idx| !idx.is_empty() && idx.bytes().all(|b| b.is_ascii_digit()));
        if is_block {
            blocks += 1;
        }
    }

    if blocks == 0 {
        return Err(QueryError::NotFound(format!("memory blocks in {}", dir.display())));
    }

    debug!("{} memory blocks of {} bytes", blocks, block_size);
    Ok(blocks.saturating_mul(block_size) / 1024)
}

/// `block_size_bytes` is hexadecimal without a prefix.
fn parse_block_size(content: &str) -> QueryResult<u64> {
    let trimmed = content.trim().trim_start_matches("0x");
    u64::from_str_radix(trimmed, 16)
        .ok()
        .filter(|size| *size > 0)
        .ok_or_else(|| QueryError::UnderlyingCallFailed {
            code: -1,
            message: format!("bad memory block size '{}'", content.trim()),
        })
}
