use super::ecodes::*;

/// Text typed by `code` on a US layout, as `(plain, shifted)`.
/// Keys that produce no text (modifiers, function keys, ...) map to `None`.
pub fn lookup(code: u16) -> Option<(&'static str, &'static str)> {
    let pair = match code {
        KEY_0 => ("0", ")"),
        KEY_1 => ("1", "!"),
        KEY_2 => ("2", "@"),
        KEY_3 => ("3", "#"),
        KEY_4 => ("4", "$"),
        KEY_5 => ("5", "%"),
        KEY_6 => ("6", "^"),
        KEY_7 => ("7", "&"),
        KEY_8 => ("8", "*"),
        KEY_9 => ("9", "("),
        KEY_A => ("a", "A"),
        KEY_B => ("b", "B"),
        KEY_C => ("c", "C"),
        KEY_D => ("d", "D"),
        KEY_E => ("e", "E"),
        KEY_F => ("f", "F"),
        KEY_G => ("g", "G"),
        KEY_H => ("h", "H"),
        KEY_I => ("i", "I"),
        KEY_J => ("j", "J"),
        KEY_K => ("k", "K"),
        KEY_L => ("l", "L"),
        KEY_M => ("m", "M"),
        KEY_N => ("n", "N"),
        KEY_O => ("o", "O"),
        KEY_P => ("p", "P"),
        KEY_Q => ("q", "Q"),
        KEY_R => ("r", "R"),
        KEY_S => ("s", "S"),
        KEY_T => ("t", "T"),
        KEY_U => ("u", "U"),
        KEY_V => ("v", "V"),
        KEY_W => ("w", "W"),
        KEY_X => ("x", "X"),
        KEY_Y => ("y", "Y"),
        KEY_Z => ("z", "Z"),
        KEY_APOSTROPHE => ("'", "\""),
        KEY_BACKSLASH => ("\\", "|"),
        KEY_BACKSPACE => ("\x08", "\x08"),
        KEY_COMMA => (",", "<"),
        KEY_DOT => (".", ">"),
        KEY_ENTER => ("\n", "\n"),
        KEY_EQUAL => ("=", "+"),
        KEY_GRAVE => ("`", "~"),
        KEY_MINUS => ("-", "_"),
        KEY_SEMICOLON => (";", ":"),
        KEY_SLASH => ("/", "?"),
        KEY_SPACE => (" ", " "),
        KEY_TAB => ("\t", "\t"),
        _ => return None,
    };
    Some(pair)
}

pub fn text(code: u16, shift: bool) -> Option<&'static str> {
    lookup(code).map(|(plain, shifted)| if shift { shifted } else { plain })
}
