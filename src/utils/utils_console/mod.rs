use colored::{ColoredString, Colorize};

/// Prints the given string with the given color.
///
/// ## Example
/// ```
/// use invgeom::utils::utils_console::{invgeom_print, PrintMode, PrintColor};
/// invgeom_print("test", PrintMode::Print, PrintColor::Blue, false);
/// ```
pub fn invgeom_print(s: &str, mode: PrintMode, color: PrintColor, bolded: bool) {
    let mut string: ColoredString = s.into();
    if bolded { string = string.bold(); }
    string = match color {
        PrintColor::None => { string }
        PrintColor::Blue => { string.blue() }
        PrintColor::Green => { string.green() }
        PrintColor::Red => { string.red() }
        PrintColor::Yellow => { string.yellow() }
        PrintColor::Cyan => { string.cyan() }
        PrintColor::Magenta => { string.magenta() }
    };
    match mode {
        PrintMode::Println => { println!("{}", string); }
        PrintMode::Print => { print!("{}", string); }
    }
}

pub fn invgeom_print_new_line() {
    invgeom_print("\n", PrintMode::Print, PrintColor::None, false);
}

/// Println will cause a new line after the string, while Print will not.
#[derive(Clone, Debug)]
pub enum PrintMode {
    Println,
    Print
}

/// Defines color for an invgeom print command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PrintColor {
    None,
    Blue,
    Green,
    Red,
    Yellow,
    Cyan,
    Magenta
}
