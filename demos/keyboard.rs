//! Echoes what is typed on any attached keyboard (or pressed on the buttons).

use std::io::Write;

use remarkable_hw::input::{DeviceClass, Input, InputEvent};
use remarkable_hw::{Config, Model};

fn main() -> remarkable_hw::Result<()> {
    env_logger::init();

    let mut input = Input::with_classes(Config::from_env(), Model::current(), &[DeviceClass::Key])?;
    input.rescan()?;
    eprintln!("Listening on {:?}", input.key_devices());

    let stdout = std::io::stdout();
    while let Some(event) = input.poll(true)? {
        let key = match event {
            InputEvent::Key(key) => key,
            _ => continue,
        };
        if key.is_release() {
            continue;
        }
        match key.text() {
            Some(text) => {
                let mut out = stdout.lock();
                out.write_all(text.as_bytes())?;
                out.flush()?;
            }
            None => eprintln!("\n{:?} held: {:?}", key.keycode(), key.pressed),
        }
    }
    Ok(())
}
