//! Classification of the members of a single `std140` uniform block.
//!
//! The block is scanned line by line. Slot positions come from the hand-written layout
//! comments (`// vec4 N:` and `// mat4 (vec4 N-M):`), section labels from the comment
//! following a `═══` divider. Nothing is validated: stale or inconsistent annotations
//! are carried into the output as-is.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

const SECTION_DIVIDER: &str = "═══";
const DIVIDER_CHAR: char = '═';
const UNKNOWN_SECTION: &str = "Unknown";

/// Slots occupied by a `mat4` in `std140` layout.
const MAT4_SLOTS: u64 = 4;

lazy_static! {
    static ref BLOCK_START_RE: Regex =
        Regex::new(r"^layout\s*\(\s*std140\s*\)\s*uniform\s+(\w+)\s*\{").unwrap();
    static ref VEC4_SLOT_RE: Regex = Regex::new(r"^//\s*vec4\s+(\d+):").unwrap();
    static ref MAT4_SLOT_RE: Regex = Regex::new(r"^//\s*mat4\s*\(vec4\s*(\d+)-(\d+)\):").unwrap();
    /// Declaration recognizers, in order of precedence. Group 1 is the type keyword,
    /// group 2 the name, group 3 the trailing comment.
    static ref DECLARATION_RULES: [Regex; 3] = [
        Regex::new(r"^(mat4)\s+(\w+)\s*;\s*(?://\s*(.*))?").unwrap(),
        Regex::new(r"^(float)\s+(\w+)\s*;\s*(?://\s*(.*))?").unwrap(),
        Regex::new(r"^(vec[234])\s+(\w+)\s*;\s*(?://\s*(.*))?").unwrap(),
    ];
}

/// Suggested destination for a parameter after the refactor.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Domain {
    Camera,
    Frame,
    EffectRuntime,
    DebugReserved,
    EffectConfig,
}

impl Domain {
    /// Guesses the domain from the parameter name. Advisory only.
    pub fn guess(name: &str) -> Domain {
        const CAMERA: &[&str] = &[
            "camerax",
            "cameray",
            "cameraz",
            "forwardx",
            "forwardy",
            "forwardz",
            "upx",
            "upy",
            "upz",
            "fov",
            "aspectratio",
            "nearplane",
            "farplane",
            "viewproj",
            "invviewproj",
        ];

        let name = name.to_lowercase();

        if contains_any(&name, CAMERA) {
            Domain::Camera
        } else if name == "time" {
            Domain::Frame
        } else if contains_any(&name, INSTANCE_POSITION) {
            Domain::EffectRuntime
        } else if name.contains("debug") || name.contains("reserved") {
            Domain::DebugReserved
        } else if name.contains("flying") {
            Domain::Camera
        } else {
            Domain::EffectConfig
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Domain::Camera => "**Camera**",
            Domain::Frame => "**Frame**",
            Domain::EffectRuntime => "EffectRuntime?",
            Domain::DebugReserved => "Debug/Reserved",
            Domain::EffectConfig => "EffectConfig",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum UpdateFrequency {
    PerFrame,
    PerFrameMaybe,
    Never,
    OnChange,
}

impl UpdateFrequency {
    /// Guesses how often the parameter changes from its name. Advisory only.
    pub fn guess(name: &str) -> UpdateFrequency {
        const CAMERA_DRIVEN: &[&str] = &["camera", "forward", "up", "viewproj", "invviewproj"];

        let name = name.to_lowercase();

        if name == "time" || contains_any(&name, CAMERA_DRIVEN) {
            UpdateFrequency::PerFrame
        } else if contains_any(&name, INSTANCE_POSITION) {
            UpdateFrequency::PerFrameMaybe
        } else if name.contains("reserved") {
            UpdateFrequency::Never
        } else {
            UpdateFrequency::OnChange
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UpdateFrequency::PerFrame => "per-frame",
            UpdateFrequency::PerFrameMaybe => "per-frame?",
            UpdateFrequency::Never => "never",
            UpdateFrequency::OnChange => "on-change",
        }
    }
}

impl fmt::Display for UpdateFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const INSTANCE_POSITION: &[&str] = &["centerx", "centery", "centerz", "radius"];

fn contains_any(name: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| name.contains(needle))
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GlslType {
    Float,
    Vec2,
    Vec3,
    Vec4,
    Mat4,
}

impl GlslType {
    fn from_keyword(keyword: &str) -> Option<GlslType> {
        Some(match keyword {
            "float" => GlslType::Float,
            "vec2" => GlslType::Vec2,
            "vec3" => GlslType::Vec3,
            "vec4" => GlslType::Vec4,
            "mat4" => GlslType::Mat4,
            _ => return None,
        })
    }

    pub fn keyword(self) -> &'static str {
        match self {
            GlslType::Float => "float",
            GlslType::Vec2 => "vec2",
            GlslType::Vec3 => "vec3",
            GlslType::Vec4 => "vec4",
            GlslType::Mat4 => "mat4",
        }
    }
}

impl fmt::Display for GlslType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// One member of the classified block.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BlockParameter {
    /// vec4 slot the member starts at, as annotated in the source
    pub slot: u64,
    pub name: String,
    pub glsl_type: GlslType,

    /// Label of the most recent section divider, or "Unknown"
    pub section: String,

    /// Trailing `//` comment of the declaration line
    pub comment: String,
}

impl BlockParameter {
    pub fn domain_guess(&self) -> Domain {
        Domain::guess(&self.name)
    }

    pub fn update_frequency_guess(&self) -> UpdateFrequency {
        UpdateFrequency::guess(&self.name)
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct ClassifiedBlock {
    /// Name of the block that was actually scanned, if one was found
    pub block_name: Option<String>,
    pub parameters: Vec<BlockParameter>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum ScanState {
    SearchingBlock,
    InBlock,
    Done,
}

/// Line-driven state machine behind [`classify_block`].
pub struct BlockClassifier<'t> {
    target_block: Option<&'t str>,
    state: ScanState,
    current_section: String,
    current_slot: u64,
    result: ClassifiedBlock,
}

impl<'t> BlockClassifier<'t> {
    /// Scans for `target_block`, or for the first `std140` block if `None`.
    pub fn new(target_block: Option<&'t str>) -> Self {
        BlockClassifier {
            target_block,
            state: ScanState::SearchingBlock,
            current_section: UNKNOWN_SECTION.to_owned(),
            current_slot: 0,
            result: ClassifiedBlock::default(),
        }
    }

    pub fn is_done(&self) -> bool {
        self.state == ScanState::Done
    }

    /// Processes `line`. `next_line` is only consulted when `line` is a section divider,
    /// so a declaration on the divider line already carries the new label.
    pub fn feed_line(&mut self, line: &str, next_line: Option<&str>) {
        let stripped = line.trim();

        match self.state {
            ScanState::Done => {}
            ScanState::SearchingBlock => self.try_enter_block(stripped),
            ScanState::InBlock => {
                if stripped.starts_with('}') {
                    self.state = ScanState::Done;
                    return;
                }

                if line.contains(SECTION_DIVIDER) {
                    if let Some(next_line) = next_line {
                        self.try_take_section_label(next_line.trim());
                    }
                }

                self.track_slot_comment(stripped);
                self.try_declaration(stripped);
            }
        }
    }

    pub fn finish(self) -> ClassifiedBlock {
        self.result
    }

    fn try_enter_block(&mut self, stripped: &str) {
        let captures = match BLOCK_START_RE.captures(stripped) {
            Some(captures) => captures,
            None => return,
        };

        let found = &captures[1];
        if self.target_block.map_or(true, |target| target == found) {
            log::info!("Found uniform block: {}", found);
            self.result.block_name = Some(found.to_owned());
            self.state = ScanState::InBlock;
        }
    }

    fn try_take_section_label(&mut self, stripped: &str) {
        if !stripped.starts_with("//") {
            return;
        }

        let label = stripped.trim_start_matches('/').trim();
        if !label.is_empty() && !label.contains(DIVIDER_CHAR) {
            log::info!("  Section: {}", label);
            self.current_section = label.to_owned();
        }
    }

    fn track_slot_comment(&mut self, stripped: &str) {
        let slot = VEC4_SLOT_RE
            .captures(stripped)
            .or_else(|| MAT4_SLOT_RE.captures(stripped))
            .map(|captures| captures[1].to_owned());

        if let Some(digits) = slot {
            match digits.parse::<u64>() {
                Ok(slot) => self.current_slot = slot,
                Err(err) => log::warn!("Ignoring slot annotation {}: {}", digits, err),
            }
        }
    }

    fn try_declaration(&mut self, stripped: &str) {
        let captures = match DECLARATION_RULES
            .iter()
            .find_map(|rule| rule.captures(stripped))
        {
            Some(captures) => captures,
            None => return,
        };

        let glsl_type = match GlslType::from_keyword(&captures[1]) {
            Some(glsl_type) => glsl_type,
            None => return,
        };
        let comment = captures.get(3).map_or("", |m| m.as_str().trim());

        let (slot, comment) = if glsl_type == GlslType::Mat4 {
            let slot = self.current_slot;
            self.current_slot = self.current_slot.saturating_add(MAT4_SLOTS);
            (slot, format!("(4 slots) {}", comment))
        } else {
            (self.current_slot, comment.to_owned())
        };

        self.result.parameters.push(BlockParameter {
            slot,
            name: captures[2].to_owned(),
            glsl_type,
            section: self.current_section.clone(),
            comment,
        });
    }
}

/// Classifies the members of the first `std140` uniform block in `source` whose name
/// matches `target_block` (any name if `None`). Scanning stops at the block's closing brace.
pub fn classify_block(source: &str, target_block: Option<&str>) -> ClassifiedBlock {
    let mut classifier = BlockClassifier::new(target_block);
    let mut lines = source.split('\n').peekable();
    while let Some(line) = lines.next() {
        classifier.feed_line(line, lines.peek().copied());
        if classifier.is_done() {
            break;
        }
    }
    classifier.finish()
}
