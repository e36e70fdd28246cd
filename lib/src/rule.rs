use crate::error::TransitionError;
use std::fmt::{self, Debug, Display, Formatter};

/// The number of entries in a transition table, one for each 3x3 neighborhood.
pub const TABLE_SIZE: usize = 512;

/// The bit of the center cell in a neighborhood code.
pub const CENTER: usize = 1 << 4;

/// Valid isotropic transition letters for each neighbor count.
const LETTERS: [&str; 9] = [
    "c",
    "ce",
    "aceikn",
    "aceijknqry",
    "aceijknqrtwyz",
    "aceijknqry",
    "aceikn",
    "ce",
    "c",
];

/// Neighborhood codes of each isotropic birth transition.
///
/// Survival codes are the same codes with the [`CENTER`] bit set.
#[rustfmt::skip]
static TRANSITIONS: [(u8, char, &[u16]); 51] = [
    (0, 'c', &[0]),
    (1, 'c', &[4, 256, 1, 64]),
    (1, 'e', &[2, 128, 8, 32]),
    (2, 'c', &[5, 320, 65, 260]),
    (2, 'e', &[34, 160, 10, 136]),
    (2, 'k', &[66, 129, 258, 264, 12, 96, 132, 33]),
    (2, 'a', &[6, 384, 3, 9, 72, 36, 192, 288]),
    (2, 'i', &[130, 40]),
    (2, 'n', &[68, 257]),
    (3, 'c', &[69, 321, 261, 324]),
    (3, 'e', &[42, 168, 138, 162]),
    (3, 'k', &[98, 161, 266, 140]),
    (3, 'a', &[38, 416, 11, 200]),
    (3, 'i', &[292, 73, 7, 448]),
    (3, 'n', &[37, 352, 13, 67, 193, 262, 328, 388]),
    (3, 'y', &[133, 322, 97, 268]),
    (3, 'q', &[100, 289, 265, 259, 196, 70, 76, 385]),
    (3, 'j', &[137, 74, 164, 224, 35, 392, 290, 14]),
    (3, 'r', &[131, 194, 134, 104, 41, 296, 386, 44]),
    (4, 'c', &[325]),
    (4, 'e', &[170]),
    (4, 'k', &[99, 225, 270, 330, 141, 354, 396, 165]),
    (4, 'a', &[420, 294, 201, 39, 480, 15, 75, 456]),
    (4, 'i', &[45, 360, 195, 390]),
    (4, 'n', &[356, 293, 329, 263, 452, 71, 77, 449]),
    (4, 'y', &[389, 326, 197, 101, 353, 269, 323, 332]),
    (4, 'q', &[102, 417, 267, 204]),
    (4, 'j', &[169, 106, 172, 226, 163, 394, 298, 142]),
    (4, 'r', &[139, 202, 166, 232, 43, 424, 418, 46]),
    (4, 't', &[135, 450, 105, 300]),
    (4, 'w', &[228, 291, 393, 78]),
    (4, 'z', &[198, 387, 297, 108]),
    (5, 'c', &[426, 174, 234, 171]),
    (5, 'e', &[453, 327, 357, 333]),
    (5, 'k', &[397, 334, 229, 355]),
    (5, 'a', &[457, 79, 484, 295]),
    (5, 'i', &[203, 422, 488, 47]),
    (5, 'n', &[458, 143, 482, 428, 302, 233, 167, 107]),
    (5, 'y', &[362, 173, 398, 227]),
    (5, 'q', &[395, 206, 230, 236, 299, 425, 419, 110]),
    (5, 'j', &[358, 421, 331, 271, 460, 103, 205, 481]),
    (5, 'r', &[364, 301, 361, 391, 454, 199, 109, 451]),
    (6, 'c', &[490, 175, 430, 235]),
    (6, 'e', &[461, 335, 485, 359]),
    (6, 'k', &[429, 366, 237, 231, 483, 399, 363, 462]),
    (6, 'a', &[489, 111, 492, 486, 423, 459, 303, 207]),
    (6, 'i', &[365, 455]),
    (6, 'n', &[427, 238]),
    (7, 'c', &[491, 239, 494, 431]),
    (7, 'e', &[493, 367, 487, 463]),
    (8, 'c', &[495]),
];

/// Neighborhood codes of a single isotropic transition.
fn transition_codes(count: u8, letter: char) -> &'static [u16] {
    TRANSITIONS
        .iter()
        .find(|&&(c, l, _)| c == count && l == letter)
        .map_or(&[], |&(_, _, codes)| codes)
}

/// Parse a transition name such as `3`, `2c`, `4ait` or `4-a` into neighborhood codes.
fn parse_transition(name: &str) -> Result<Vec<u16>, TransitionError> {
    let mut chars = name.chars();
    let first = chars.next().ok_or(TransitionError::Empty)?;
    let count = first
        .to_digit(10)
        .filter(|&c| c <= 8)
        .ok_or_else(|| TransitionError::InvalidCount(name.to_string()))? as u8;

    let rest = chars.as_str();
    let (negate, letters) = match rest.strip_prefix('-') {
        Some(letters) => (true, letters),
        None => (false, rest),
    };

    let valid = LETTERS[count as usize];
    if let Some(letter) = letters.chars().find(|&l| !valid.contains(l)) {
        return Err(TransitionError::InvalidLetter { count, letter });
    }

    Ok(valid
        .chars()
        .filter(|&l| letters.is_empty() || letters.contains(l) != negate)
        .flat_map(|l| transition_codes(count, l).iter().copied())
        .collect())
}

/// A transition table of a two-state range-1 Moore rule.
///
/// The table is indexed by a 9-bit neighborhood code, where each bit is a cell in the 3x3
/// neighborhood:
///
/// ```text
/// 8 5 2
/// 7 4 1
/// 6 3 0
/// ```
///
/// So moving one column to the right is `((code << 3) & 511) | column`,
/// where `column` is `top << 2 | middle << 1 | bottom`.
///
/// Bit 4 is the cell itself: the same table holds both birth and survival conditions.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TransitionTable {
    table: [u8; TABLE_SIZE],
}

impl Debug for TransitionTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TransitionTable")
            .field(&format_args!("{self}"))
            .finish()
    }
}

/// Writes the isotropic rule string of the table, e.g. `B3/S23` or `B2-a/S12`.
///
/// Each isotropic transition is judged by its first neighborhood code,
/// so the result is only meaningful for isotropic tables.
impl Display for TransitionTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "B")?;
        self.write_transitions(f, 0)?;
        write!(f, "/S")?;
        self.write_transitions(f, CENTER)
    }
}

impl TransitionTable {
    /// Create a transition table from a lookup table.
    ///
    /// # Panics
    ///
    /// Panics if any entry is neither 0 nor 1.
    pub fn new(table: [u8; TABLE_SIZE]) -> Self {
        assert!(
            table.iter().all(|&v| v <= 1),
            "transition table entries must be 0 or 1"
        );
        Self { table }
    }

    /// Create a transition table from a slice.
    ///
    /// # Panics
    ///
    /// Panics if the slice does not have exactly 512 entries, or if any entry is neither 0 nor 1.
    pub fn from_slice(table: &[u8]) -> Self {
        assert_eq!(table.len(), TABLE_SIZE, "transition table must have 512 entries");
        let mut array = [0; TABLE_SIZE];
        array.copy_from_slice(table);
        Self::new(array)
    }

    /// Create an outer-totalistic transition table from lists of neighbor counts.
    pub fn life_like(birth: &[u8], survival: &[u8]) -> Self {
        let mut table = [0; TABLE_SIZE];
        for (code, entry) in table.iter_mut().enumerate() {
            let count = (code & !CENTER).count_ones() as u8;
            let counts = if code & CENTER == 0 { birth } else { survival };
            *entry = counts.contains(&count) as u8;
        }
        Self { table }
    }

    /// Create an isotropic transition table from lists of transition names.
    ///
    /// A transition name is a neighbor count, optionally followed by transition letters
    /// (`2c`, `4ait`), or by `-` and letters to exclude (`4-a`).
    pub fn from_transitions<S: AsRef<str>>(
        birth: &[S],
        survival: &[S],
    ) -> Result<Self, TransitionError> {
        let mut table = [0; TABLE_SIZE];
        for name in birth {
            for code in parse_transition(name.as_ref())? {
                table[code as usize] = 1;
            }
        }
        for name in survival {
            for code in parse_transition(name.as_ref())? {
                table[code as usize | CENTER] = 1;
            }
        }
        Ok(Self { table })
    }

    /// Whether a cell with the given neighborhood code is alive in the next generation.
    #[inline]
    pub const fn fires(&self, code: usize) -> bool {
        self.table[code] != 0
    }

    /// Whether the table contains the given birth transition.
    ///
    /// A transition with several letters is contained if all of its codes give birth.
    pub fn has_transition(&self, name: &str) -> Result<bool, TransitionError> {
        Ok(parse_transition(name)?
            .into_iter()
            .all(|code| self.fires(code as usize)))
    }

    /// Whether a dead cell with no living neighbors becomes alive.
    #[inline]
    pub const fn contains_b0(&self) -> bool {
        self.table[0] != 0
    }

    /// The raw lookup table.
    #[inline]
    pub const fn as_array(&self) -> &[u8; TABLE_SIZE] {
        &self.table
    }

    /// Write the transitions for one half of the table.
    fn write_transitions(&self, f: &mut Formatter<'_>, center: usize) -> fmt::Result {
        for (count, valid) in LETTERS.iter().enumerate() {
            let fired = valid
                .chars()
                .filter(|&l| {
                    let codes = transition_codes(count as u8, l);
                    self.fires(codes[0] as usize | center)
                })
                .collect::<String>();

            if fired.is_empty() {
                continue;
            }

            write!(f, "{count}")?;
            if fired.len() == valid.len() {
                continue;
            }
            if fired.len() * 2 > valid.len() {
                let missing = valid
                    .chars()
                    .filter(|&l| !fired.contains(l))
                    .collect::<String>();
                write!(f, "-{missing}")?;
            } else {
                write!(f, "{fired}")?;
            }
        }
        Ok(())
    }
}
