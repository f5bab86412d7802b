//! Interactive playback over an assembled playlist.
//!
//! Drives the core sequencer from stdin; the "player" prints what a real
//! embedded player would load. `e` simulates the player's natural
//! end-of-segment callback, which auto-advances.

use anyhow::Result;
use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};

use manabi_core::{Advance, Player, PlayerEvent, Playlist, Sequencer, format_timestamp};

/// Prints load requests instead of embedding a real player.
struct ConsolePlayer;

impl Player for ConsolePlayer {
    fn load(&mut self, video_id: &str, start_time: f64, end_time: f64) {
        println!(
            "{} https://youtu.be/{} [{}–{}]",
            style("▶").green().bold(),
            video_id,
            format_timestamp(start_time),
            format_timestamp(end_time)
        );
    }
}

fn print_position<P: Player>(seq: &Sequencer<P>) {
    if let Some(entry) = seq.current_entry() {
        println!(
            "{} {}/{} {}",
            style("Now:").dim(),
            seq.current_index() + 1,
            seq.len(),
            style(&entry.video.title).cyan()
        );
    }
}

pub async fn run(playlist: Playlist) -> Result<()> {
    let mut seq = Sequencer::new(ConsolePlayer);
    seq.handle_player_event(PlayerEvent::Ready);
    seq.load_playlist(playlist.entries);
    seq.play_at(0);
    // The console player starts instantly.
    seq.handle_player_event(PlayerEvent::ActivelyPlaying);
    print_position(&seq);

    println!(
        "{}",
        style("Commands: [n]ext, [p]revious, <number> to jump, [e]nd of segment, [q]uit").dim()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "q" | "quit" => break,
            "n" | "next" => match seq.next() {
                Advance::Moved => {
                    seq.handle_player_event(PlayerEvent::ActivelyPlaying);
                    print_position(&seq);
                }
                Advance::EndOfPlaylist => {
                    println!("{} End of playlist reached.", style("∎").yellow().bold());
                }
                Advance::Blocked => {}
            },
            "p" | "previous" => match seq.previous() {
                Advance::Moved => {
                    seq.handle_player_event(PlayerEvent::ActivelyPlaying);
                    print_position(&seq);
                }
                _ => println!("{}", style("Already at the first segment.").dim()),
            },
            "e" | "ended" => match seq.handle_player_event(PlayerEvent::Ended) {
                Some(Advance::Moved) => {
                    seq.handle_player_event(PlayerEvent::ActivelyPlaying);
                    print_position(&seq);
                }
                Some(Advance::EndOfPlaylist) => {
                    println!(
                        "{} All segments finished. Well done!",
                        style("✓").green().bold()
                    );
                    break;
                }
                _ => {}
            },
            number => {
                if let Ok(index) = number.parse::<usize>() {
                    // 1-based on the printed playlist
                    if index >= 1 && seq.play_at(index - 1) {
                        seq.handle_player_event(PlayerEvent::ActivelyPlaying);
                        print_position(&seq);
                    } else {
                        println!(
                            "{}",
                            style(format!("No segment {number}; playlist has {}.", seq.len()))
                                .dim()
                        );
                    }
                } else if !number.is_empty() {
                    println!("{}", style("Unknown command.").dim());
                }
            }
        }
    }

    Ok(())
}
