//! protrack CLI: load a ProTracker module, print its layout, play it.
//!
//! Usage:
//!   protrack <file.mod>                  play until Enter is pressed
//!   protrack <file.mod> --seconds 30     play for 30 seconds
//!   protrack <file.mod> --pattern 0      dump pattern 0 instead of playing

use std::time::Duration;
use std::{env, fs};

use pt_ir::{note_name, Song, CHANNELS, ROWS};
use pt_player::Player;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let path = args.get(1).unwrap_or_else(|| {
        eprintln!("Usage: protrack <file.mod> [--seconds N] [--pattern N]");
        std::process::exit(1);
    });

    let seconds = flag_value(&args, "--seconds");
    let pattern = flag_value(&args, "--pattern");

    let data = fs::read(path).unwrap_or_else(|e| {
        eprintln!("Failed to read {}: {}", path, e);
        std::process::exit(1);
    });

    let mut player = Player::new();
    player.load(&data).unwrap_or_else(|e| {
        eprintln!("Failed to decode module: {}", e);
        std::process::exit(1);
    });

    let song = player.song().expect("song was just loaded");
    print_info(song);

    if let Some(index) = pattern {
        dump_pattern(song, index);
        return;
    }

    player.play();
    match seconds {
        Some(n) => {
            println!("Playing for {n} seconds...");
            std::thread::sleep(Duration::from_secs(n as u64));
        }
        None => {
            println!("Playing. Press Enter to stop.");
            let mut line = String::new();
            let _ = std::io::stdin().read_line(&mut line);
        }
    }
    player.stop();
    println!("Done.");
}

fn flag_value(args: &[String], flag: &str) -> Option<usize> {
    let value = args.iter().position(|a| a == flag).and_then(|i| args.get(i + 1))?;
    match value.parse() {
        Ok(n) => Some(n),
        Err(_) => {
            eprintln!("Invalid value for {}: {}", flag, value);
            std::process::exit(1);
        }
    }
}

fn print_info(song: &Song) {
    println!("Title:     {}", song.title);
    println!("Patterns:  {}", song.patterns.len());
    println!("Positions: {}", song.order.len());
    println!("Samples:   {} (with data)", song.loaded_sample_count());
    println!();

    for (i, slot) in song.samples.iter().enumerate() {
        if slot.is_empty() {
            continue;
        }
        println!(
            "  {:2}: {:<26} {:6} bytes  vol {:2}  loop {}+{}w",
            i + 1,
            slot.name,
            slot.len_bytes(),
            slot.volume,
            slot.repeat_point_words,
            slot.repeat_length_words,
        );
    }
    println!();
}

fn dump_pattern(song: &Song, index: usize) {
    let Some(pattern) = song.patterns.get(index) else {
        eprintln!("No pattern {} (module has {})", index, song.patterns.len());
        std::process::exit(1);
    };

    for row in 0..ROWS {
        print!("{:02} |", row);
        for channel in 0..CHANNELS {
            let cell = pattern.cell(row, channel);
            let note = match note_name(cell.period) {
                Some(name) => name,
                None if cell.period == 0 => "...",
                None => "???",
            };
            if cell.sample_number > 0 {
                print!(" {} {:02X}", note, cell.sample_number);
            } else {
                print!(" {} ..", note);
            }
            print!(" {:X}{:02X} |", cell.effect, cell.effect_param);
        }
        println!();
    }
}
