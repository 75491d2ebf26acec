// SPDX-License-Identifier: GPL-3.0-only

use std::io::Write;

const BAR_WIDTH: usize = 36;

pub fn compute_progress_percent(done: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }

    let ratio = done as f64 / total as f64;
    (ratio * 100.0).clamp(0.0, 100.0)
}

/// Render `[#####-----]  50.0%  done/total` for the batch removal loop.
pub fn render_bar(done: usize, total: usize) -> String {
    let filled = if total == 0 {
        0
    } else {
        (done.min(total) * BAR_WIDTH) / total
    };

    format!(
        "[{}{}] {:>5.1}%  {}/{}",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        compute_progress_percent(done, total),
        done,
        total
    )
}

pub fn print_progress_line<W: Write>(out: &mut W, done: usize, total: usize) -> std::io::Result<()> {
    write!(out, "\r{}", render_bar(done, total))?;
    if done >= total {
        writeln!(out)?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_fills_proportionally() {
        assert_eq!(
            render_bar(0, 4),
            format!("[{}]   0.0%  0/4", "-".repeat(BAR_WIDTH))
        );
        assert_eq!(
            render_bar(4, 4),
            format!("[{}] 100.0%  4/4", "#".repeat(BAR_WIDTH))
        );
        assert!(render_bar(2, 4).starts_with(&format!("[{}-", "#".repeat(BAR_WIDTH / 2))));
    }

    #[test]
    fn percent_handles_zero_total() {
        assert_eq!(compute_progress_percent(3, 0), 0.0);
        assert_eq!(compute_progress_percent(1, 4), 25.0);
    }

    #[test]
    fn final_step_ends_the_line() {
        let mut out = Vec::new();
        print_progress_line(&mut out, 1, 2).unwrap();
        print_progress_line(&mut out, 2, 2).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with('\r'));
        assert!(text.ends_with("2/2\n"));
    }
}
