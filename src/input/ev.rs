use std::collections::VecDeque;
use std::io;
use std::os::unix::io::{AsRawFd, RawFd};
use std::path::{Path, PathBuf};
use std::time::Instant;

use evdev::raw_stream::RawDevice;
use fxhash::{FxHashMap, FxHashSet};
use log::{debug, info, warn};

use super::scan::{self, DeviceClass, DeviceInfo};
use super::state::{DeviceEventState, RawEvent};
use super::{InputEvent, ScreenMapping};
use crate::config::Config;
use crate::device::Model;
use crate::error::{Error, Result};

/// Readiness events fetched per `epoll_wait`.
const MAX_READY: usize = 16;

/// Something the poller can wait on and read kernel reports from.
pub trait EventSource: AsRawFd {
    /// Reports available now. `WouldBlock` when there are none.
    fn fetch(&mut self) -> io::Result<Vec<RawEvent>>;
}

impl EventSource for RawDevice {
    fn fetch(&mut self) -> io::Result<Vec<RawEvent>> {
        Ok(self.fetch_events()?.map(|e| RawEvent::from(&e)).collect())
    }
}

/// Opens the device at a path and describes it.
pub type DeviceOpener = Box<dyn FnMut(&Path) -> io::Result<(Box<dyn EventSource>, DeviceInfo)>>;

fn open_evdev(path: &Path) -> io::Result<(Box<dyn EventSource>, DeviceInfo)> {
    let device = RawDevice::open(path)?;
    let info = DeviceInfo::probe(path, &device)?;
    Ok((Box::new(device), info))
}

struct OpenDevice {
    source: Box<dyn EventSource>,
    info: DeviceInfo,
    state: DeviceEventState,
}

/// Multiplexes every open input device through one epoll instance and hands out
/// reassembled events one at a time.
///
/// Unless it was built from an explicit device list, the set of devices is
/// refreshed from `Config::input_dir` at most once per `Config::rescan_interval`.
/// A device that goes away mid-read is dropped and polling carries on with the rest.
pub struct Input {
    config: Config,
    mapping: ScreenMapping,
    epfd: RawFd,
    opener: DeviceOpener,
    devices: FxHashMap<PathBuf, OpenDevice>,
    paths_by_fd: FxHashMap<RawFd, PathBuf>,
    /// Devices seen by a rescan but excluded by `classes`
    ignored: FxHashSet<PathBuf>,
    /// Devices the caller closed. Rescans leave them alone while their node exists.
    closed: FxHashSet<PathBuf>,
    classes: Option<Vec<DeviceClass>>,
    restricted: bool,
    last_scan: Option<Instant>,
    ready: VecDeque<InputEvent>,
}

impl Input {
    /// Every input device of the device we are running on.
    pub fn new() -> Result<Input> {
        Input::with_config(Config::from_env(), Model::current())
    }

    pub fn with_config(config: Config, model: Model) -> Result<Input> {
        Input::build(config, model, None, false, Box::new(open_evdev))
    }

    /// Only devices of the given classes, including ones plugged in later.
    pub fn with_classes(config: Config, model: Model, classes: &[DeviceClass]) -> Result<Input> {
        Input::build(
            config,
            model,
            Some(classes.to_vec()),
            false,
            Box::new(open_evdev),
        )
    }

    /// Exactly the devices at `paths`. No rescans happen.
    pub fn with_devices<P: AsRef<Path>>(config: Config, model: Model, paths: &[P]) -> Result<Input> {
        let mut input = Input::build(config, model, None, true, Box::new(open_evdev))?;
        for path in paths {
            input.register(path.as_ref())?;
        }
        Ok(input)
    }

    /// Like `with_config`, with the nodes of `Config::input_dir` opened by `opener`.
    pub fn with_opener(config: Config, model: Model, opener: DeviceOpener) -> Result<Input> {
        Input::build(config, model, None, false, opener)
    }

    fn build(
        config: Config,
        model: Model,
        classes: Option<Vec<DeviceClass>>,
        restricted: bool,
        opener: DeviceOpener,
    ) -> Result<Input> {
        let epfd = epoll::create(true).map_err(|source| Error::Backend {
            op: "epoll_create",
            source,
        })?;
        Ok(Input {
            config,
            mapping: ScreenMapping::new(model),
            epfd,
            opener,
            devices: FxHashMap::default(),
            paths_by_fd: FxHashMap::default(),
            ignored: FxHashSet::default(),
            closed: FxHashSet::default(),
            classes,
            restricted,
            last_scan: None,
            ready: VecDeque::new(),
        })
    }

    pub fn mapping(&self) -> &ScreenMapping {
        &self.mapping
    }

    pub fn devices(&self) -> impl Iterator<Item = &DeviceInfo> {
        self.devices.values().map(|open| &open.info)
    }

    fn paths_where(&self, pred: impl Fn(&DeviceInfo) -> bool) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self
            .devices()
            .filter(|info| pred(info))
            .map(|info| info.path.clone())
            .collect();
        paths.sort();
        paths
    }

    pub fn touch_devices(&self) -> Vec<PathBuf> {
        self.paths_where(|info| info.class == DeviceClass::Touch)
    }

    pub fn wacom_devices(&self) -> Vec<PathBuf> {
        self.paths_where(|info| info.class == DeviceClass::Wacom)
    }

    pub fn key_devices(&self) -> Vec<PathBuf> {
        self.paths_where(|info| info.class == DeviceClass::Key)
    }

    /// Devices reporting absolute positions, whatever their class.
    pub fn position_devices(&self) -> Vec<PathBuf> {
        self.paths_where(DeviceInfo::is_position)
    }

    fn accepts(&self, class: DeviceClass) -> bool {
        self.classes
            .as_ref()
            .map_or(true, |classes| classes.contains(&class))
    }

    /// Opens `path` and adds it to the poll set. Returns whether it was added.
    fn register(&mut self, path: &Path) -> Result<bool> {
        let (source, info) = (self.opener)(path)?;
        if !self.accepts(info.class) {
            debug!("ignoring {:?} ({}), class {:?}", path, info.name, info.class);
            self.ignored.insert(path.to_path_buf());
            return Ok(false);
        }

        let fd = source.as_raw_fd();
        set_nonblocking(fd)?;
        let event = epoll::Event::new(epoll::Events::EPOLLIN, fd as u64);
        epoll::ctl(self.epfd, epoll::ControlOptions::EPOLL_CTL_ADD, fd, event).map_err(
            |source| Error::Backend {
                op: "epoll_ctl",
                source,
            },
        )?;

        info!("registered {:?} ({}) as {:?}", path, info.name, info.class);
        self.closed.remove(path);
        self.paths_by_fd.insert(fd, path.to_path_buf());
        self.devices.insert(
            path.to_path_buf(),
            OpenDevice {
                source,
                info,
                state: DeviceEventState::new(),
            },
        );
        Ok(true)
    }

    /// Stops polling `path`. Rescans will not reopen it until its node has
    /// disappeared and come back. Returns false if it was not open.
    pub fn close_device(&mut self, path: &Path) -> bool {
        if !self.deregister(path) {
            return false;
        }
        self.closed.insert(path.to_path_buf());
        info!("closed {:?}", path);
        true
    }

    fn deregister(&mut self, path: &Path) -> bool {
        let open = match self.devices.remove(path) {
            Some(open) => open,
            None => return false,
        };
        let fd = open.source.as_raw_fd();
        self.paths_by_fd.remove(&fd);
        let event = epoll::Event::new(epoll::Events::empty(), 0);
        if let Err(e) = epoll::ctl(self.epfd, epoll::ControlOptions::EPOLL_CTL_DEL, fd, event) {
            debug!("epoll_ctl DEL for {:?}: {}", path, e);
        }
        true
    }

    /// Registers devices that appeared since the last scan.
    pub fn rescan(&mut self) -> Result<()> {
        self.last_scan = Some(Instant::now());
        let paths = scan::event_paths(&self.config.input_dir)?;
        self.ignored.retain(|path| paths.contains(path));
        self.closed.retain(|path| paths.contains(path));
        for path in paths {
            if self.devices.contains_key(&path)
                || self.ignored.contains(&path)
                || self.closed.contains(&path)
            {
                continue;
            }
            if let Err(e) = self.register(&path) {
                debug!("skipping {:?}: {}", path, e);
            }
        }
        Ok(())
    }

    fn rescan_due(&self) -> bool {
        !self.restricted
            && self
                .last_scan
                .map_or(true, |at| at.elapsed() >= self.config.rescan_interval)
    }

    /// Next reassembled event.
    ///
    /// With `block` false, returns `Ok(None)` as soon as nothing is ready. With
    /// `block` true, waits until something arrives; it only gives up and returns
    /// `Ok(None)` when restricted to a fixed device list that has become empty.
    ///
    /// Looking for new devices happens on the way in, at most once per
    /// `Config::rescan_interval`, so a device plugged in just after a scan shows
    /// up within that interval. Call `rescan` to pick it up sooner.
    pub fn poll(&mut self, block: bool) -> Result<Option<InputEvent>> {
        loop {
            if let Some(event) = self.ready.pop_front() {
                return Ok(Some(event));
            }
            if self.rescan_due() {
                self.rescan()?;
            }
            if self.restricted && self.devices.is_empty() {
                return Ok(None);
            }

            let timeout = if block {
                self.config.rescan_interval.as_millis().min(i32::MAX as u128) as i32
            } else {
                0
            };
            let mut events = [epoll::Event::new(epoll::Events::empty(), 0); MAX_READY];
            let count = match epoll::wait(self.epfd, timeout, &mut events) {
                Ok(count) => count,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => 0,
                Err(source) => {
                    return Err(Error::Backend {
                        op: "epoll_wait",
                        source,
                    })
                }
            };
            for event in &events[..count] {
                let fd = event.data as RawFd;
                self.read_device(fd)?;
            }

            if !block && self.ready.is_empty() {
                return Ok(None);
            }
        }
    }

    /// Drains what `fd` has to offer into `ready`.
    fn read_device(&mut self, fd: RawFd) -> Result<()> {
        let path = match self.paths_by_fd.get(&fd) {
            Some(path) => path.clone(),
            None => return Ok(()),
        };
        let open = match self.devices.get_mut(&path) {
            Some(open) => open,
            None => return Ok(()),
        };

        match open.source.fetch() {
            Ok(events) => {
                for event in events {
                    if let Some(frame) = open.state.push(event) {
                        self.ready
                            .push_back(InputEvent::decode(&open.info, &self.mapping, frame));
                    }
                }
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(()),
            Err(e) if is_removal(&e) => {
                warn!("{:?} went away ({}), no longer polling it", path, e);
                self.deregister(&path);
                Ok(())
            }
            Err(e) => Err(Error::Io(e)),
        }
    }
}

impl Drop for Input {
    fn drop(&mut self) {
        let paths: Vec<PathBuf> = self.devices.keys().cloned().collect();
        for path in paths {
            self.deregister(&path);
        }
        if let Err(e) = epoll::close(self.epfd) {
            warn!("failed to close epoll fd: {}", e);
        }
    }
}

fn set_nonblocking(fd: RawFd) -> Result<()> {
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags < 0 {
        return Err(Error::last_os("fcntl(F_GETFL)"));
    }
    if unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) } < 0 {
        return Err(Error::last_os("fcntl(F_SETFL)"));
    }
    Ok(())
}

/// Errors a read returns once the device node is gone.
fn is_removal(e: &io::Error) -> bool {
    matches!(
        e.raw_os_error(),
        Some(libc::ENODEV) | Some(libc::ENOENT) | Some(libc::EBADF)
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::input::ecodes::*;
    use crate::input::scan::Capabilities;
    use crate::input::AxisRange;
    use std::cell::RefCell;
    use std::io::{Read, Write};
    use std::os::unix::net::UnixStream;
    use std::rc::Rc;
    use std::time::Duration;

    type Script = Rc<RefCell<VecDeque<io::Result<Vec<RawEvent>>>>>;

    /// Plays back queued reads. Each queued read makes the socket readable once.
    struct ScriptedDevice {
        rx: UnixStream,
        script: Script,
    }

    impl AsRawFd for ScriptedDevice {
        fn as_raw_fd(&self) -> RawFd {
            self.rx.as_raw_fd()
        }
    }

    impl EventSource for ScriptedDevice {
        fn fetch(&mut self) -> io::Result<Vec<RawEvent>> {
            let mut byte = [0u8; 1];
            self.rx.read_exact(&mut byte)?;
            self.script
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(io::ErrorKind::WouldBlock.into()))
        }
    }

    /// Our end of a scripted device.
    struct Feed {
        tx: UnixStream,
        script: Script,
    }

    impl Feed {
        fn push(&mut self, read: io::Result<Vec<RawEvent>>) {
            self.script.borrow_mut().push_back(read);
            self.tx.write_all(&[0]).unwrap();
        }
    }

    type Feeds = Rc<RefCell<FxHashMap<PathBuf, Feed>>>;

    fn device_info(path: &Path, class: DeviceClass) -> DeviceInfo {
        let absolute = class == DeviceClass::Touch;
        DeviceInfo {
            path: path.to_path_buf(),
            name: format!("{:?}", class),
            class,
            capabilities: Capabilities {
                absolute,
                keys: !absolute,
                stylus: false,
                tracking_id_max: if absolute { 9 } else { 0 },
            },
            x_range: Some(AxisRange { min: 0, max: 100 }),
            y_range: Some(AxisRange { min: 0, max: 100 }),
        }
    }

    /// An input dir with `event0` (touch) and `event1` (keys), opened as scripted devices.
    fn scripted_input(tag: &str) -> (Input, Feeds, PathBuf) {
        let config = empty_input_dir(tag);
        let dir = config.input_dir.clone();
        std::fs::write(dir.join("event0"), b"").unwrap();
        std::fs::write(dir.join("event1"), b"").unwrap();

        let feeds: Feeds = Rc::new(RefCell::new(FxHashMap::default()));
        let registry = feeds.clone();
        let opener: DeviceOpener = Box::new(move |path: &Path| {
            let class = if path.ends_with("event0") {
                DeviceClass::Touch
            } else {
                DeviceClass::Key
            };
            let (tx, rx) = UnixStream::pair()?;
            let script: Script = Rc::new(RefCell::new(VecDeque::new()));
            registry.borrow_mut().insert(
                path.to_path_buf(),
                Feed {
                    tx,
                    script: script.clone(),
                },
            );
            Ok((
                Box::new(ScriptedDevice { rx, script }) as Box<dyn EventSource>,
                device_info(path, class),
            ))
        });
        let input = Input::with_opener(config, Model::Gen2, opener).unwrap();
        (input, feeds, dir)
    }

    fn feed(feeds: &Feeds, path: &Path, read: io::Result<Vec<RawEvent>>) {
        feeds.borrow_mut().get_mut(path).unwrap().push(read);
    }

    fn syn() -> RawEvent {
        RawEvent::new(EV_SYN, SYN_REPORT, 0)
    }

    fn drain(input: &mut Input) -> Vec<InputEvent> {
        let mut out = Vec::new();
        while let Some(event) = input.poll(false).unwrap() {
            out.push(event);
        }
        out
    }

    fn empty_input_dir(tag: &str) -> Config {
        let dir = std::env::temp_dir().join(format!("input-{}-{}", tag, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        Config {
            input_dir: dir,
            rescan_interval: Duration::from_secs(3600),
            ..Config::default()
        }
    }

    #[test]
    fn frames_from_several_devices() {
        let (mut input, feeds, dir) = scripted_input("multiplex");
        let (touch, keys) = (dir.join("event0"), dir.join("event1"));
        assert!(input.poll(false).unwrap().is_none());
        assert_eq!(input.touch_devices(), vec![touch.clone()]);
        assert_eq!(input.key_devices(), vec![keys.clone()]);

        // A touch frame split across two reads, a key frame in between
        feed(&feeds, &touch, Ok(vec![
            RawEvent::new(EV_ABS, ABS_MT_TRACKING_ID, 1),
            RawEvent::new(EV_ABS, ABS_MT_POSITION_X, 50),
        ]));
        feed(&feeds, &keys, Ok(vec![RawEvent::new(EV_KEY, KEY_A, 1), syn()]));
        let events = drain(&mut input);
        assert_eq!(events.len(), 1);
        match &events[0] {
            InputEvent::Key(key) => assert_eq!(key.text(), Some("a")),
            other => panic!("unexpected {:?}", other),
        }

        feed(&feeds, &touch, Ok(vec![RawEvent::new(EV_ABS, ABS_MT_POSITION_Y, 25), syn()]));
        feed(&feeds, &keys, Ok(vec![RawEvent::new(EV_KEY, KEY_A, 0), syn()]));
        let events = drain(&mut input);
        assert_eq!(events.len(), 2);
        let touch_event = events
            .iter()
            .find_map(|e| match e {
                InputEvent::Touch(t) => Some(t),
                _ => None,
            })
            .unwrap();
        assert_eq!(touch_event.tracking_id(), Some(1));
        assert_eq!(touch_event.x(), Some(50));
        assert_eq!(touch_event.y(), Some(25));
        assert_eq!(touch_event.frame.raw_events.len(), 3);
        assert!(events.iter().any(|e| matches!(e, InputEvent::Key(k) if k.is_release())));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn vanished_device_is_dropped() {
        let (mut input, feeds, dir) = scripted_input("vanish");
        let (touch, keys) = (dir.join("event0"), dir.join("event1"));
        assert!(input.poll(false).unwrap().is_none());

        feed(&feeds, &touch, Err(io::Error::from_raw_os_error(libc::ENODEV)));
        feed(&feeds, &keys, Ok(vec![RawEvent::new(EV_KEY, KEY_B, 1), syn()]));
        let events = drain(&mut input);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].device(), keys.as_path());
        assert!(input.touch_devices().is_empty());

        feed(&feeds, &keys, Ok(vec![RawEvent::new(EV_KEY, KEY_B, 0), syn()]));
        assert_eq!(drain(&mut input).len(), 1);

        // Not closed by us, so it comes back on the next scan
        input.rescan().unwrap();
        assert_eq!(input.touch_devices(), vec![touch]);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn spurious_wakeups_are_quiet() {
        let (mut input, feeds, dir) = scripted_input("wouldblock");
        let keys = dir.join("event1");
        assert!(input.poll(false).unwrap().is_none());

        feed(&feeds, &keys, Err(io::ErrorKind::WouldBlock.into()));
        assert!(input.poll(false).unwrap().is_none());
        feed(&feeds, &keys, Err(io::ErrorKind::Interrupted.into()));
        assert!(input.poll(false).unwrap().is_none());
        assert_eq!(input.key_devices(), vec![keys.clone()]);

        feed(&feeds, &keys, Err(io::Error::from_raw_os_error(libc::EIO)));
        assert!(matches!(input.poll(false), Err(Error::Io(_))));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn closed_device_stays_closed() {
        let (mut input, feeds, dir) = scripted_input("closed");
        let (touch, keys) = (dir.join("event0"), dir.join("event1"));
        assert!(input.poll(false).unwrap().is_none());

        feed(&feeds, &touch, Ok(vec![RawEvent::new(EV_ABS, ABS_MT_POSITION_X, 1), syn()]));
        assert!(input.close_device(&touch));
        assert!(!input.close_device(&touch));
        assert!(input.poll(false).unwrap().is_none());

        input.rescan().unwrap();
        assert!(input.touch_devices().is_empty());
        assert_eq!(input.key_devices(), vec![keys]);

        // Unplugged and plugged back in
        std::fs::remove_file(&touch).unwrap();
        input.rescan().unwrap();
        std::fs::write(&touch, b"").unwrap();
        input.rescan().unwrap();
        assert_eq!(input.touch_devices(), vec![touch]);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn nothing_to_read() {
        let config = empty_input_dir("empty");
        let dir = config.input_dir.clone();
        let mut input = Input::with_config(config, Model::Gen2).unwrap();
        assert!(input.poll(false).unwrap().is_none());
        assert_eq!(input.devices().count(), 0);
        assert!(input.touch_devices().is_empty());
        assert!(input.position_devices().is_empty());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn unopenable_nodes_are_skipped() {
        let config = empty_input_dir("bogus");
        let dir = config.input_dir.clone();
        std::fs::write(dir.join("event0"), b"").unwrap();
        let mut input =
            Input::with_classes(config, Model::Gen1, &[DeviceClass::Key]).unwrap();
        assert!(input.poll(false).unwrap().is_none());
        assert!(input.key_devices().is_empty());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_input_dir_is_an_error() {
        let config = Config {
            input_dir: PathBuf::from("/nonexistent/input"),
            ..Config::default()
        };
        let mut input = Input::with_config(config, Model::Gen2).unwrap();
        assert!(input.poll(false).is_err());
    }

    #[test]
    fn restricted_list() {
        let config = empty_input_dir("restricted");
        let dir = config.input_dir.clone();
        assert!(Input::with_devices(config.clone(), Model::Gen2, &[dir.join("event9")]).is_err());

        let mut input = Input::with_devices::<PathBuf>(config, Model::Gen2, &[]).unwrap();
        // Nothing left to wait on, even when blocking
        assert!(input.poll(true).unwrap().is_none());
        assert!(!input.close_device(&dir.join("event0")));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn removal_errors() {
        assert!(is_removal(&io::Error::from_raw_os_error(libc::ENODEV)));
        assert!(is_removal(&io::Error::from_raw_os_error(libc::EBADF)));
        assert!(!is_removal(&io::Error::from_raw_os_error(libc::EAGAIN)));
        assert!(!is_removal(&io::Error::new(io::ErrorKind::Other, "x")));
    }
}
