use crate::config::APP_NAME;

const BAR_WIDTH: usize = 25;

pub fn render(progress: u8) -> String {
    let progress = progress.min(100) as usize;
    let filled = progress * BAR_WIDTH / 100;
    format!(
        "{} [{}{}] {:>3}%",
        APP_NAME,
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled),
        progress
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_fill() {
        assert_eq!(render(0), format!("PAWNIN [{}]   0%", ".".repeat(25)));
        assert_eq!(render(100), format!("PAWNIN [{}] 100%", "#".repeat(25)));
        assert!(render(40).contains(&format!("[{}{}]", "#".repeat(10), ".".repeat(15))));
    }
}
