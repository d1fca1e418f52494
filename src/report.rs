//! Host and call-site information dumped through [`Logger::raw`].
//!
//! Host figures come from `sysinfo`. Anything the platform does not expose
//! is reported as `unknown` or skipped; none of these functions fail.

use std::panic::Location;

use sysinfo::{Disks, Pid, ProcessRefreshKind, System, MINIMUM_CPU_UPDATE_INTERVAL};

use crate::logger::Logger;

const KB: u64 = 1024;
const MB: u64 = 1024 * 1024;

/// Log the file and line of whoever called this.
///
/// `Location` carries no function name, so the column is reported instead.
#[track_caller]
pub fn print_caller(logger: &Logger) {
    let location = Location::caller();
    logger.raw(&format!(
        "Caller Details\n\t\t{}({}:{})",
        location.file(),
        location.line(),
        location.column()
    ));
}

pub fn print_process_info(logger: &Logger) {
    logger.raw(&process_info());
}

pub fn print_os_info(logger: &Logger) {
    logger.raw(&os_info());
    logger.raw(&platform_info());
}

pub fn print_cpu_info(logger: &Logger) {
    let mut sys = System::new();
    sys.refresh_cpu();
    for (i, cpu) in sys.cpus().iter().enumerate() {
        logger.raw(&format!(
            "CPU[{i}] Mhz [{}] {}[{}]",
            cpu.frequency(),
            cpu.vendor_id(),
            cpu.brand()
        ));
    }
}

/// Usage per CPU, sampled over the shortest interval `sysinfo` supports.
pub fn print_cpu_usage(logger: &Logger) {
    let mut sys = System::new();
    sys.refresh_cpu();
    std::thread::sleep(MINIMUM_CPU_UPDATE_INTERVAL);
    sys.refresh_cpu();
    for (i, cpu) in sys.cpus().iter().enumerate() {
        logger.raw(&format!("Cpu[{i}] {:.6}%", cpu.cpu_usage()));
    }
}

pub fn print_mem_info(logger: &Logger) {
    let mut sys = System::new();
    sys.refresh_memory();
    logger.raw(&mem_info_line(sys.total_memory(), sys.available_memory()));
}

/// Memory held by this process.
pub fn print_mem_usage(logger: &Logger) {
    let Some((resident, virtual_memory)) = current_process(|process| {
        (process.memory(), process.virtual_memory())
    }) else {
        logger.raw("MemApp(KB) unavailable");
        return;
    };
    logger.raw(&format!(
        "MemApp(KB) Resident {}, Virtual {}",
        resident / KB,
        virtual_memory / KB
    ));
}

pub fn print_disk_info(logger: &Logger) {
    let disks = Disks::new_with_refreshed_list();
    for disk in disks.list() {
        logger.raw(&disk_line(
            &disk.mount_point().display().to_string(),
            &disk.file_system().to_string_lossy(),
            disk.total_space(),
            disk.available_space(),
        ));
    }
}

/// OS, process, CPU, memory and disk details, in that order.
pub fn print_system_info(logger: &Logger) {
    print_os_info(logger);
    print_process_info(logger);
    print_cpu_info(logger);
    print_mem_info(logger);
    print_disk_info(logger);
}

fn process_info() -> String {
    let mut line = format!("Process pid[{}]", std::process::id());
    if let Some(ppid) = parent_pid() {
        line.push_str(&format!(" ppid[{ppid}]"));
    }
    if let Some(uid) = user_id() {
        line.push_str(&format!(" uid[{uid}]"));
    }
    line
}

#[cfg(unix)]
fn parent_pid() -> Option<u32> {
    Some(std::os::unix::process::parent_id())
}

#[cfg(not(unix))]
const fn parent_pid() -> Option<u32> {
    None
}

#[cfg(unix)]
fn user_id() -> Option<String> {
    current_process(|process| process.user_id().map(|uid| (**uid).to_string())).flatten()
}

#[cfg(not(unix))]
const fn user_id() -> Option<String> {
    None
}

fn current_process<T>(read: impl FnOnce(&sysinfo::Process) -> T) -> Option<T> {
    let pid = Pid::from_u32(std::process::id());
    let mut sys = System::new();
    sys.refresh_process_specifics(pid, ProcessRefreshKind::everything());
    sys.process(pid).map(read)
}

fn os_info() -> String {
    let threads = std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get);
    format!(
        "OS [{}] Arch [{}] MaxThreads[{threads}]",
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

fn platform_info() -> String {
    let unknown = || "unknown".to_string();
    format!(
        "Platform [{}] Family[{}] Version[{}]",
        System::name().unwrap_or_else(unknown),
        System::distribution_id(),
        System::os_version().unwrap_or_else(unknown)
    )
}

fn mem_info_line(total: u64, available: u64) -> String {
    let used_percent = if total == 0 {
        0.0
    } else {
        #[allow(clippy::cast_precision_loss)]
        let ratio = total.saturating_sub(available) as f64 / total as f64;
        ratio * 100.0
    };
    format!(
        "MemSys(KB) Total: {}, Available:{}, Used:{used_percent:.6}%",
        total / KB,
        available / KB
    )
}

fn disk_line(mount_point: &str, file_system: &str, total: u64, available: u64) -> String {
    let used_percent = if total == 0 {
        0.0
    } else {
        #[allow(clippy::cast_precision_loss)]
        let ratio = total.saturating_sub(available) as f64 / total as f64;
        ratio * 100.0
    };
    format!(
        "Disk [{mount_point}] [{file_system}] Total(MB)[{}] Free(MB)[{}] Used[{used_percent:.2}%]",
        total / MB,
        available / MB
    )
}
