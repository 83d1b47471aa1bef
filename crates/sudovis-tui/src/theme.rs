use crossterm::style::Color;

/// Colors used by the terminal views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Screen background
    pub bg: Color,
    /// Default text color
    pub fg: Color,
    /// Thin grid line color
    pub border: Color,
    /// Thick 3x3 separator color
    pub box_border: Color,
    /// Caller-supplied given digits
    pub given: Color,
    /// Solver-placed digits
    pub filled: Color,
    /// Empty cell dot color
    pub empty: Color,
    /// Selected cell background
    pub selected_bg: Color,
    /// Background of cells sharing the cursor's row, column, or box
    pub highlight_bg: Color,
    /// Background of the cell the solver is currently trying
    pub trial_bg: Color,
    /// Conflicting digits and failed solves
    pub error: Color,
    /// Successful solves
    pub success: Color,
    /// Secondary text
    pub info: Color,
    /// Key binding labels
    pub key: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb { r: 16, g: 18, b: 26 },
            fg: Color::Rgb { r: 225, g: 228, b: 235 },
            border: Color::Rgb { r: 62, g: 68, b: 84 },
            box_border: Color::Rgb { r: 120, g: 132, b: 160 },
            given: Color::Rgb { r: 245, g: 246, b: 250 },
            filled: Color::Rgb { r: 96, g: 170, b: 240 },
            empty: Color::Rgb { r: 110, g: 120, b: 150 },
            selected_bg: Color::Rgb { r: 60, g: 82, b: 130 },
            highlight_bg: Color::Rgb { r: 30, g: 34, b: 48 },
            trial_bg: Color::Rgb { r: 160, g: 130, b: 36 },
            error: Color::Rgb { r: 240, g: 95, b: 95 },
            success: Color::Rgb { r: 100, g: 230, b: 140 },
            info: Color::Rgb { r: 150, g: 156, b: 178 },
            key: Color::Rgb { r: 240, g: 200, b: 110 },
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            bg: Color::Rgb { r: 250, g: 250, b: 253 },
            fg: Color::Rgb { r: 28, g: 30, b: 38 },
            border: Color::Rgb { r: 188, g: 190, b: 202 },
            box_border: Color::Rgb { r: 70, g: 74, b: 96 },
            given: Color::Rgb { r: 10, g: 10, b: 16 },
            filled: Color::Rgb { r: 36, g: 92, b: 190 },
            empty: Color::Rgb { r: 148, g: 150, b: 168 },
            selected_bg: Color::Rgb { r: 190, g: 208, b: 250 },
            highlight_bg: Color::Rgb { r: 234, g: 236, b: 245 },
            trial_bg: Color::Rgb { r: 250, g: 214, b: 120 },
            error: Color::Rgb { r: 208, g: 58, b: 58 },
            success: Color::Rgb { r: 46, g: 150, b: 70 },
            info: Color::Rgb { r: 102, g: 104, b: 122 },
            key: Color::Rgb { r: 190, g: 128, b: 30 },
        }
    }
}
