use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Key of the message queue the rm2fb compositor listens on.
pub const SWTFB_MESSAGE_QUEUE_ID: i32 = 0x2257c;

/// Where things live on the device, and a couple of policy knobs.
///
/// `Config::default()` matches a stock reMarkable. `Config::from_env()` starts from
/// the defaults and applies any overrides found in the environment:
///
/// | variable                      | field                 |
/// |-------------------------------|-----------------------|
/// | `LIBREMARKABLE_MACHINE_PATH`  | `machine_path`        |
/// | `LIBREMARKABLE_FB_PATH`       | `framebuffer_path`    |
/// | `LIBREMARKABLE_SHM_PATH`      | `shm_path`            |
/// | `LIBREMARKABLE_INPUT_DIR`     | `input_dir`           |
/// | `RM2FB_NO_WAIT_IOCTL` (set)   | `swtfb_wait = false`  |
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// One-line platform identifier read by the device classifier
    pub machine_path: PathBuf,
    /// Character device of the kernel framebuffer
    pub framebuffer_path: PathBuf,
    /// Shared memory segment published by the rm2fb compositor
    pub shm_path: PathBuf,
    pub msg_queue_key: i32,
    /// When false, waits on the rm2fb backend return immediately
    pub swtfb_wait: bool,
    pub input_dir: PathBuf,
    /// Upper bound on how long a blocking input poll goes without looking for new devices
    pub rescan_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            machine_path: PathBuf::from("/sys/devices/soc0/machine"),
            framebuffer_path: PathBuf::from("/dev/fb0"),
            shm_path: PathBuf::from("/dev/shm/swtfb.01"),
            msg_queue_key: SWTFB_MESSAGE_QUEUE_ID,
            swtfb_wait: true,
            input_dir: PathBuf::from("/dev/input"),
            rescan_interval: Duration::from_millis(1000),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Config::default();
        if let Some(path) = env::var_os("LIBREMARKABLE_MACHINE_PATH") {
            config.machine_path = path.into();
        }
        if let Some(path) = env::var_os("LIBREMARKABLE_FB_PATH") {
            config.framebuffer_path = path.into();
        }
        if let Some(path) = env::var_os("LIBREMARKABLE_SHM_PATH") {
            config.shm_path = path.into();
        }
        if let Some(path) = env::var_os("LIBREMARKABLE_INPUT_DIR") {
            config.input_dir = path.into();
        }
        if env::var_os("RM2FB_NO_WAIT_IOCTL").is_some() {
            config.swtfb_wait = false;
        }
        config
    }

    /// Whether the compositor's shared memory segment currently exists.
    /// Never cached: the compositor can come and go while we run.
    pub fn shm_present(&self) -> bool {
        self.shm_path.exists()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_point_at_device_paths() {
        let config = Config::default();
        assert_eq!(config.framebuffer_path, PathBuf::from("/dev/fb0"));
        assert_eq!(config.shm_path, PathBuf::from("/dev/shm/swtfb.01"));
        assert_eq!(config.msg_queue_key, 0x2257c);
        assert!(config.swtfb_wait);
    }

    #[test]
    fn shm_probe_follows_filesystem() {
        let mut config = Config::default();
        config.shm_path = env::temp_dir().join(format!("swtfb-probe-{}", std::process::id()));
        assert!(!config.shm_present());
        std::fs::write(&config.shm_path, b"").unwrap();
        assert!(config.shm_present());
        std::fs::remove_file(&config.shm_path).unwrap();
        assert!(!config.shm_present());
    }
}
