#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() {
    say_it_later_lib::run()
}
