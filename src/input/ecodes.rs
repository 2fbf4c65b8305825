// Used event codes (input events as standardized in the linux kernel)
// See https://github.com/torvalds/linux/blob/master/include/uapi/linux/input-event-codes.h

// Event types
pub const EV_SYN: u16 = 0x00;
pub const EV_KEY: u16 = 0x01; // BTN prefixed constants are of type EV_KEY, too
pub const EV_ABS: u16 = 0x03;

// Sync boundaries
pub const SYN_REPORT: u16 = 0x00;
pub const SYN_MT_REPORT: u16 = 0x02;
pub const SYN_DROPPED: u16 = 0x03; // the kernel's event buffer overflowed

// Absolute (Wacom Digitizer on reMarkable)
pub const ABS_X: u16 = 0x00; // = 0
pub const ABS_Y: u16 = 0x01; // = 1
pub const ABS_PRESSURE: u16 = 0x18; // = 24
pub const ABS_DISTANCE: u16 = 0x19; // = 25
pub const ABS_TILT_X: u16 = 0x1a; // = 26
pub const ABS_TILT_Y: u16 = 0x1b; // = 27

// Absolute Multitouch (Touchpad on reMarkable)
pub const ABS_MT_SLOT: u16 = 0x2f; // = 47
pub const ABS_MT_TOUCH_MAJOR: u16 = 0x30; // = 48
pub const ABS_MT_TOUCH_MINOR: u16 = 0x31; // = 49
pub const ABS_MT_ORIENTATION: u16 = 0x34; // = 52
pub const ABS_MT_POSITION_X: u16 = 0x35; // = 53
pub const ABS_MT_POSITION_Y: u16 = 0x36; // = 54
pub const ABS_MT_TRACKING_ID: u16 = 0x39; // = 57
pub const ABS_MT_PRESSURE: u16 = 0x3a; // = 58

// Keys (Wacom Digitizer buttons on reMarkable)
pub const BTN_TOOL_PEN: u16 = 0x140; // = 320
pub const BTN_TOOL_RUBBER: u16 = 0x141; // = 321
pub const BTN_TOUCH: u16 = 0x14a; // = 330
pub const BTN_STYLUS: u16 = 0x14b; // = 331
pub const BTN_STYLUS2: u16 = 0x14c; // = 332

// Keys (GPIOs on reMarkable)
pub const KEY_HOME: u16 = 0x66; // = 102 (aka middle button on the reMarkable)
pub const KEY_LEFT: u16 = 0x69; // = 105
pub const KEY_RIGHT: u16 = 0x6a; // = 106
pub const KEY_POWER: u16 = 0x74; // = 116

// Keys (keyboards, US layout)
pub const KEY_1: u16 = 2;
pub const KEY_2: u16 = 3;
pub const KEY_3: u16 = 4;
pub const KEY_4: u16 = 5;
pub const KEY_5: u16 = 6;
pub const KEY_6: u16 = 7;
pub const KEY_7: u16 = 8;
pub const KEY_8: u16 = 9;
pub const KEY_9: u16 = 10;
pub const KEY_0: u16 = 11;
pub const KEY_MINUS: u16 = 12;
pub const KEY_EQUAL: u16 = 13;
pub const KEY_BACKSPACE: u16 = 14;
pub const KEY_TAB: u16 = 15;
pub const KEY_Q: u16 = 16;
pub const KEY_W: u16 = 17;
pub const KEY_E: u16 = 18;
pub const KEY_R: u16 = 19;
pub const KEY_T: u16 = 20;
pub const KEY_Y: u16 = 21;
pub const KEY_U: u16 = 22;
pub const KEY_I: u16 = 23;
pub const KEY_O: u16 = 24;
pub const KEY_P: u16 = 25;
pub const KEY_ENTER: u16 = 28;
pub const KEY_A: u16 = 30;
pub const KEY_S: u16 = 31;
pub const KEY_D: u16 = 32;
pub const KEY_F: u16 = 33;
pub const KEY_G: u16 = 34;
pub const KEY_H: u16 = 35;
pub const KEY_J: u16 = 36;
pub const KEY_K: u16 = 37;
pub const KEY_L: u16 = 38;
pub const KEY_SEMICOLON: u16 = 39;
pub const KEY_APOSTROPHE: u16 = 40;
pub const KEY_GRAVE: u16 = 41;
pub const KEY_LEFTSHIFT: u16 = 42;
pub const KEY_BACKSLASH: u16 = 43;
pub const KEY_Z: u16 = 44;
pub const KEY_X: u16 = 45;
pub const KEY_C: u16 = 46;
pub const KEY_V: u16 = 47;
pub const KEY_B: u16 = 48;
pub const KEY_N: u16 = 49;
pub const KEY_M: u16 = 50;
pub const KEY_COMMA: u16 = 51;
pub const KEY_DOT: u16 = 52;
pub const KEY_SLASH: u16 = 53;
pub const KEY_RIGHTSHIFT: u16 = 54;
pub const KEY_SPACE: u16 = 57;
