use crate::{summary::LearningGuide, types::Playlist};

/// Format seconds as MM:SS timestamp
pub fn format_timestamp(seconds: f64) -> String {
    let mins = (seconds / 60.0) as u32;
    let secs = (seconds % 60.0) as u32;
    format!("{:02}:{:02}", mins, secs)
}

/// Format a playlist as human-readable markdown, reporting actual vs
/// requested duration (a partial fill is success, not an error).
pub fn format_playlist_readable(playlist: &Playlist, theme: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("# Playlist: {}\n\n", theme));
    output.push_str(&format!(
        "**Duration:** {} of {} requested | **Entries:** {}\n\n",
        format_timestamp(playlist.total_duration),
        format_timestamp(playlist.target_duration),
        playlist.len()
    ));

    for (i, entry) in playlist.entries.iter().enumerate() {
        let start = format_timestamp(entry.segment.start_time);
        let end = format_timestamp(entry.segment.end_time);
        output.push_str(&format!(
            "{}. [{}–{}] {} (score {:.2})\n",
            i + 1,
            start,
            end,
            entry.video.title,
            entry.segment.score()
        ));
        if !entry.segment.summary.is_empty() {
            output.push_str(&format!("   {}\n", entry.segment.summary));
        }
    }

    output
}

/// Format a learning guide as human-readable markdown.
pub fn format_guide_readable(guide: &LearningGuide, theme: &str, related: &[String]) -> String {
    let mut output = String::new();

    output.push_str(&format!("# Learning guide: {}\n\n", theme));
    output.push_str(&format!("{}\n\n", guide.theme_explanation));

    output.push_str("## Key learning points\n\n");
    for point in &guide.learning_points {
        output.push_str(&format!("- {}\n", point));
    }

    output.push_str("\n## Keywords\n\n");
    for keyword in &guide.keywords {
        output.push_str(&format!("- **{}**: {}\n", keyword.term, keyword.explanation));
    }

    output.push_str("\n## Roadmap\n\n");
    for (i, step) in guide.roadmap.iter().enumerate() {
        output.push_str(&format!("{}. {}\n", i + 1, step));
    }

    if !related.is_empty() {
        output.push_str("\n## Explore next\n\n");
        for theme in related {
            output.push_str(&format!("- {}\n", theme));
        }
    }

    output
}
