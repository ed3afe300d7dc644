//! Windows platform implementation
//!
//! Registry reads go through `winreg`; memory figures come from
//! `GlobalMemoryStatusEx` and `GetPhysicallyInstalledSystemMemory`.

#![cfg(target_os = "windows")]

use std::mem::size_of;

use tracing::debug;
use windows::core::PCWSTR;
use windows::Win32::System::Environment::ExpandEnvironmentStringsW;
use windows::Win32::System::SystemInformation::{
    GetPhysicallyInstalledSystemMemory, GlobalMemoryStatusEx, MEMORYSTATUSEX,
};
use winreg::enums::{
    RegType, HKEY_CLASSES_ROOT, HKEY_CURRENT_CONFIG, HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE,
    HKEY_USERS, KEY_READ,
};
use winreg::types::FromRegValue;
use winreg::{RegKey, RegValue};

use super::{HostQuery, MemoryStatus, QueryError, QueryResult, RegistryLookup, RegistryRoot};

impl From<windows::core::Error> for QueryError {
    fn from(err: windows::core::Error) -> Self {
        QueryError::UnderlyingCallFailed {
            code: err.code().0,
            message: err.message().to_string(),
        }
    }
}

/// Host queries backed by the Win32 API and the registry.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsHost;

impl WindowsHost {
    pub fn new() -> Self {
        Self
    }

    fn predef(root: RegistryRoot) -> RegKey {
        RegKey::predef(match root {
            RegistryRoot::CurrentUser => HKEY_CURRENT_USER,
            RegistryRoot::LocalMachine => HKEY_LOCAL_MACHINE,
            RegistryRoot::Users => HKEY_USERS,
            RegistryRoot::ClassesRoot => HKEY_CLASSES_ROOT,
            RegistryRoot::CurrentConfig => HKEY_CURRENT_CONFIG,
        })
    }
}

impl HostQuery for WindowsHost {
    fn memory_status(&self) -> QueryResult<MemoryStatus> {
        let mut status = MEMORYSTATUSEX {
            dwLength: size_of::<MEMORYSTATUSEX>() as u32,
            ..Default::default()
        };
        // SAFETY: `status` is a valid MEMORYSTATUSEX with dwLength set
        unsafe { GlobalMemoryStatusEx(&mut status)? };

        Ok(MemoryStatus {
            memory_load: status.dwMemoryLoad,
            total_physical: status.ullTotalPhys,
            available_physical: status.ullAvailPhys,
            total_page_file: status.ullTotalPageFile,
            available_page_file: status.ullAvailPageFile,
            total_virtual: status.ullTotalVirtual,
            available_virtual: status.ullAvailVirtual,
            available_extended_virtual: status.ullAvailExtendedVirtual,
        })
    }

    fn installed_memory_kb(&self) -> QueryResult<u64> {
        let mut kb = 0u64;
        // SAFETY: `kb` outlives the call
        unsafe { GetPhysicallyInstalledSystemMemory(&mut kb)? };
        Ok(kb)
    }

    fn registry_value(&self, lookup: &RegistryLookup) -> QueryResult<String> {
        // The opened key closes itself when dropped, on success and on error
        let key = Self::predef(lookup.root).open_subkey_with_flags(&lookup.subpath, KEY_READ)?;
        let raw = key.get_raw_value(&lookup.value_name)?;
        debug!("Read {} ({:?}, {} bytes)", lookup, raw.vtype, raw.bytes.len());
        render_reg_value(&raw)
    }

    fn backend_name(&self) -> &'static str {
        "windows"
    }
}

/// String form of a registry value. `REG_EXPAND_SZ` is returned with its
/// `%VAR%` references expanded, multi-strings are joined with a space.
fn render_reg_value(raw: &RegValue) -> QueryResult<String> {
    let text = match raw.vtype {
        RegType::REG_SZ => String::from_reg_value(raw)?,
        RegType::REG_EXPAND_SZ => expand_environment(&String::from_reg_value(raw)?)?,
        RegType::REG_MULTI_SZ => String::from_reg_value(raw)?
            .lines()
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        RegType::REG_DWORD => u32::from_reg_value(raw)?.to_string(),
        RegType::REG_QWORD => u64::from_reg_value(raw)?.to_string(),
        _ => raw
            .bytes
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(" "),
    };
    Ok(text)
}

/// Expand `%VAR%` references against the current process environment.
/// Unknown variables are left as written.
fn expand_environment(value: &str) -> QueryResult<String> {
    let wide: Vec<u16> = value.encode_utf16().chain(std::iter::once(0)).collect();
    let src = PCWSTR(wide.as_ptr());

    // SAFETY: `wide` is NUL-terminated and outlives both calls
    let mut needed = unsafe { ExpandEnvironmentStringsW(src, None) };
    loop {
        if needed == 0 {
            return Err(windows::core::Error::from_win32().into());
        }
        let mut buf = vec![0u16; needed as usize];
        // SAFETY: as above, and `buf` is sized from the previous call
        let written = unsafe { ExpandEnvironmentStringsW(src, Some(&mut buf)) };
        if written == 0 {
            return Err(windows::core::Error::from_win32().into());
        }
        if written as usize <= buf.len() {
            let len = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
            return Ok(String::from_utf16_lossy(&buf[..len]));
        }
        // Environment grew between the two calls
        needed = written;
    }
}
