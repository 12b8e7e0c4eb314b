/*============================================================
  Synavera Project: Syn-HLE
  Module: synhle_core::arch::native
  Etiquette: Synavera Script Etiquette (Rust Profile v1.1.1)
  ------------------------------------------------------------
  Purpose:
    Determine the machine's native instruction set, which may
    differ from the variant this helper was compiled for.

  Security / Safety Notes:
    Read-only sysctl/uname queries through libc.

  Dependencies:
    libc for sysctlbyname and uname.

  Operational Scope:
    Feeds the host runtime resolver's platform default.

  Revision History:
    2026-03-04 COD  Added native machine detection.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Unsafe blocks confined to single FFI calls
    - Unknown on any query failure
============================================================*/

use super::ArchitectureVariant;

/// Native variant of the current machine.
///
/// On macOS `hw.optional.arm64` is reported even when this process itself
/// runs under Rosetta, so the answer does not depend on how we were built.
#[cfg(target_os = "macos")]
pub fn native_variant() -> ArchitectureVariant {
    match sysctl_flag("hw.optional.arm64") {
        Some(true) => ArchitectureVariant::Arm64,
        _ => ArchitectureVariant::X86_64,
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
pub fn native_variant() -> ArchitectureVariant {
    uname_machine()
        .and_then(|machine| ArchitectureVariant::from_tag(&machine))
        .unwrap_or(ArchitectureVariant::Unknown)
}

#[cfg(not(unix))]
pub fn native_variant() -> ArchitectureVariant {
    ArchitectureVariant::from_tag(std::env::consts::ARCH).unwrap_or(ArchitectureVariant::Unknown)
}

/// Whether this helper process is itself running under translation.
#[cfg(target_os = "macos")]
pub fn process_is_translated() -> bool {
    sysctl_flag("sysctl.proc_translated").unwrap_or(false)
}

#[cfg(not(target_os = "macos"))]
pub fn process_is_translated() -> bool {
    false
}

#[cfg(target_os = "macos")]
fn sysctl_flag(name: &str) -> Option<bool> {
    use std::ffi::CString;

    let name = CString::new(name).ok()?;
    let mut value: libc::c_int = 0;
    let mut size = std::mem::size_of::<libc::c_int>();
    // SAFETY: `value` and `size` outlive the call and `size` matches the buffer.
    let rc = unsafe {
        libc::sysctlbyname(
            name.as_ptr(),
            (&mut value as *mut libc::c_int).cast(),
            &mut size,
            std::ptr::null_mut(),
            0,
        )
    };
    (rc == 0).then_some(value != 0)
}

#[cfg(all(unix, not(target_os = "macos")))]
fn uname_machine() -> Option<String> {
    use std::ffi::CStr;

    // SAFETY: utsname is plain data; uname fills it with NUL-terminated fields.
    let mut info: libc::utsname = unsafe { std::mem::zeroed() };
    if unsafe { libc::uname(&mut info) } != 0 {
        return None;
    }
    let machine = unsafe { CStr::from_ptr(info.machine.as_ptr()) };
    Some(machine.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_variant_is_concrete_on_supported_hosts() {
        let variant = native_variant();
        if cfg!(any(target_arch = "x86_64", target_arch = "aarch64")) {
            assert!(variant.is_concrete(), "got {variant}");
        }
    }
}
