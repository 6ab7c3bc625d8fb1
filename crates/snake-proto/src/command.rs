use crate::EncodeError;

/// How the slave interprets the commanded angle.
///
/// The discriminants are the type codes the master firmware expects in the
/// low three bits of the first byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandKind {
    /// Absolute angle ("S" in the text format).
    Absolute = 0,
    /// Angle relative to the neighbouring joint ("R" in the text format).
    #[default]
    Relative = 1,
}

impl CommandKind {
    pub fn type_code(self) -> u8 {
        self as u8
    }

    /// Letter used by the text command format.
    pub fn letter(self) -> char {
        match self {
            CommandKind::Absolute => 'S',
            CommandKind::Relative => 'R',
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "S" => Some(CommandKind::Absolute),
            "R" => Some(CommandKind::Relative),
            _ => None,
        }
    }
}

/// One joint's worth of command, before range checks.
///
/// Fields stay wide so out-of-range input is reported instead of silently
/// wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointCommand {
    pub joint_id: i32,
    pub kind: CommandKind,
    pub amplitude: i32,
    pub frequency: i32,
    /// Radians scaled by 100.
    pub phase: i32,
}

impl JointCommand {
    pub fn new(joint_id: i32, kind: CommandKind, amplitude: i32, frequency: i32, phase: i32) -> Self {
        Self { joint_id, kind, amplitude, frequency, phase }
    }
}

/// Parses the text format `id:K:amp:freq:phase`, commands joined by `&`.
pub fn parse_legacy_command(text: &str) -> Result<Vec<JointCommand>, EncodeError> {
    text.split('&').map(parse_segment).collect()
}

fn parse_segment(segment: &str) -> Result<JointCommand, EncodeError> {
    let malformed = || EncodeError::MalformedCommand { segment: segment.to_string() };

    let fields: Vec<&str> = segment.split(':').map(str::trim).collect();
    if fields.len() != 5 {
        return Err(malformed());
    }
    let int = |s: &str| s.parse::<i32>().map_err(|_| malformed());

    let joint_id = int(fields[0])?;
    let kind = CommandKind::from_code(fields[1]).ok_or_else(|| EncodeError::InvalidCommandType {
        joint: joint_id,
        code: fields[1].to_string(),
    })?;

    Ok(JointCommand {
        joint_id,
        kind,
        amplitude: int(fields[2])?,
        frequency: int(fields[3])?,
        phase: int(fields[4])?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_codes_are_wire_contract() {
        assert_eq!(CommandKind::Absolute.type_code(), 0);
        assert_eq!(CommandKind::Relative.type_code(), 1);
    }

    #[test]
    fn test_kind_letters() {
        assert_eq!(CommandKind::from_code("R"), Some(CommandKind::Relative));
        assert_eq!(CommandKind::from_code("S"), Some(CommandKind::Absolute));
        assert_eq!(CommandKind::from_code("A"), None);
        assert_eq!(CommandKind::from_code("RR"), None);
        assert_eq!(CommandKind::Relative.letter(), 'R');
        assert_eq!(CommandKind::Absolute.letter(), 'S');
    }

    #[test]
    fn test_parse_multi_joint() {
        let cmds = parse_legacy_command("1:R:100:5:0&2:S:90:6:314").unwrap();
        assert_eq!(
            cmds,
            vec![
                JointCommand::new(1, CommandKind::Relative, 100, 5, 0),
                JointCommand::new(2, CommandKind::Absolute, 90, 6, 314),
            ]
        );
    }

    #[test]
    fn test_parse_tolerates_whitespace() {
        let cmds = parse_legacy_command(" 3 : R : 100 : 50 : 0 ").unwrap();
        assert_eq!(cmds[0], JointCommand::new(3, CommandKind::Relative, 100, 50, 0));
    }

    #[test]
    fn test_parse_wrong_field_count() {
        let err = parse_legacy_command("1:R:100:5").unwrap_err();
        assert_eq!(err, EncodeError::MalformedCommand { segment: "1:R:100:5".into() });
    }

    #[test]
    fn test_parse_non_integer_field() {
        let err = parse_legacy_command("1:R:abc:5:0").unwrap_err();
        assert!(matches!(err, EncodeError::MalformedCommand { .. }));
    }

    #[test]
    fn test_parse_unknown_kind() {
        let err = parse_legacy_command("1:R:1:1:1&4:X:1:1:1").unwrap_err();
        assert_eq!(err, EncodeError::InvalidCommandType { joint: 4, code: "X".into() });
    }
}
