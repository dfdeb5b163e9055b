use crate::app::AppState;

pub fn show_help(app: &mut AppState) {
    app.show_help = true;
}

pub fn close_help(app: &mut AppState) {
    app.show_help = false;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::tree::Tree;

    #[test]
    fn test_help_toggle() {
        let mut app = AppState::new(AppConfig::default(), Tree::default());
        assert!(!app.show_help);

        show_help(&mut app);
        assert!(app.show_help);

        close_help(&mut app);
        assert!(!app.show_help);
    }
}
