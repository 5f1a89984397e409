//! Bit-packed ternary cubes
//!
//! A cube is a product term over the input variables together with the set of
//! outputs it asserts. Every position is stored as a 2-bit symbol, 32 symbols
//! per [`Word`], inputs first and outputs after:
//!
//! | code | input      | output     |
//! |------|------------|------------|
//! | `00` | empty      | 0          |
//! | `01` | 1          | 1          |
//! | `10` | 0          | (transient) |
//! | `11` | don't care | don't care |
//!
//! Unused input symbols of the last input word are padded with `11` and unused
//! output symbols with `00`, so every operation can work a whole word at a time
//! without masking the tail.
//!
//! The operations live on [`CubeLayout`] since they need to know where the input
//! part ends. They take plain word slices, which lets them run on a [`Cube`] as
//! well as on the members of a [`CubeList`].

mod list;


use std::fmt;
use std::ops::{Deref, DerefMut};

pub use list::CubeList;

/// Storage unit of a cube
pub type Word = u64;

/// Number of 2-bit symbols packed in a [`Word`]
pub const SYMBOLS_PER_WORD: usize = Word::BITS as usize / 2;

/// Low bit of every symbol
pub const MASK01: Word = 0x5555_5555_5555_5555;
/// High bit of every symbol
pub const MASK10: Word = 0xAAAA_AAAA_AAAA_AAAA;

const INPUT_ONE: Word = 0b01;
const INPUT_ZERO: Word = 0b10;
const INPUT_DONT_CARE: Word = 0b11;

const OUTPUT_OFF: Word = 0b00;
const OUTPUT_ON: Word = 0b01;
const OUTPUT_DONT_CARE: Word = 0b11;

/// Dimensions of every cube in a run
///
/// The layout is fixed once the first cube has been read and is shared by the
/// generator, the covering graph and the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CubeLayout {
    inputs: usize,
    outputs: usize,
    input_words: usize,
    output_words: usize,
}

/// Four-way comparison of two cubes, see [`CubeLayout::absorb`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Absorption {
    /// Both cubes describe the same set
    Equal,
    /// The first cube strictly covers the second
    FirstCovers,
    /// The second cube strictly covers the first
    SecondCovers,
    /// Neither covers the other
    Neither,
}

/// Relation between a merged cube and the two cubes it was produced from
///
/// Encodes `covers(merged, first) << 1 | covers(merged, second)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverRelation {
    /// The merged cube covers neither parent
    Neither = 0,
    /// The merged cube covers only the second parent
    Second = 1,
    /// The merged cube covers only the first parent
    First = 2,
    /// The merged cube covers both parents
    Both = 3,
}

impl CoverRelation {
    /// Build the relation from the two coverage tests
    pub fn from_coverage(covers_first: bool, covers_second: bool) -> Self {
        match (covers_first, covers_second) {
            (false, false) => CoverRelation::Neither,
            (false, true) => CoverRelation::Second,
            (true, false) => CoverRelation::First,
            (true, true) => CoverRelation::Both,
        }
    }
}

/// An owned cube
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Cube {
    words: Box<[Word]>,
}

impl Cube {
    /// Wrap raw words; the caller is responsible for the padding convention
    pub fn from_words(words: Vec<Word>) -> Self {
        Cube {
            words: words.into_boxed_slice(),
        }
    }

    /// Raw words of the cube
    pub fn words(&self) -> &[Word] {
        &self.words
    }
}

impl Deref for Cube {
    type Target = [Word];

    fn deref(&self) -> &[Word] {
        &self.words
    }
}

impl DerefMut for Cube {
    fn deref_mut(&mut self) -> &mut [Word] {
        &mut self.words
    }
}

impl From<&[Word]> for Cube {
    fn from(words: &[Word]) -> Self {
        Cube::from_words(words.to_vec())
    }
}

impl fmt::Debug for Cube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cube[")?;
        for (i, w) in self.words.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:016x}", w)?;
        }
        write!(f, "]")
    }
}

fn words_for(symbols: usize) -> usize {
    symbols.div_ceil(SYMBOLS_PER_WORD).max(1)
}

#[inline]
fn symbol(words: &[Word], index: usize) -> Word {
    (words[index / SYMBOLS_PER_WORD] >> (2 * (index % SYMBOLS_PER_WORD))) & 0b11
}

#[inline]
fn set_symbol(words: &mut [Word], index: usize, code: Word) {
    let shift = 2 * (index % SYMBOLS_PER_WORD);
    let word = &mut words[index / SYMBOLS_PER_WORD];
    *word = (*word & !(0b11 << shift)) | (code << shift);
}

/// Mask selecting both bits of `var` inside its word
#[inline]
pub(crate) fn variable_mask(var: usize) -> Word {
    0b11 << (2 * (var % SYMBOLS_PER_WORD))
}

impl CubeLayout {
    /// Layout for `inputs` input variables and `outputs` output bits
    pub fn new(inputs: usize, outputs: usize) -> Self {
        CubeLayout {
            inputs,
            outputs,
            input_words: words_for(inputs),
            output_words: words_for(outputs),
        }
    }

    /// Number of input variables
    pub fn inputs(&self) -> usize {
        self.inputs
    }

    /// Number of output bits
    pub fn outputs(&self) -> usize {
        self.outputs
    }

    /// Words holding the input part
    pub fn input_words(&self) -> usize {
        self.input_words
    }

    /// Words holding the output part
    pub fn output_words(&self) -> usize {
        self.output_words
    }

    /// Total words per cube
    pub fn words(&self) -> usize {
        self.input_words + self.output_words
    }

    /// Cube with every input don't care and every output off
    pub fn universe(&self) -> Cube {
        let mut words = vec![!0; self.input_words];
        words.resize(self.words(), 0);
        Cube::from_words(words)
    }

    /// Build a cube from literal values; `None` is don't care on both sides
    pub fn cube(&self, inputs: &[Option<bool>], outputs: &[Option<bool>]) -> Cube {
        let mut cube = self.universe();
        for (var, value) in inputs.iter().enumerate() {
            self.set_input(&mut cube, var, *value);
        }
        for (bit, value) in outputs.iter().enumerate() {
            self.set_output(&mut cube, bit, *value);
        }
        cube
    }

    /// Value of input `var`; `None` for don't care
    pub fn input(&self, cube: &[Word], var: usize) -> Option<bool> {
        match symbol(cube, var) {
            INPUT_ONE => Some(true),
            INPUT_ZERO => Some(false),
            _ => None,
        }
    }

    pub fn set_input(&self, cube: &mut [Word], var: usize, value: Option<bool>) {
        debug_assert!(var < self.inputs, "input {} out of range", var);
        let code = match value {
            Some(true) => INPUT_ONE,
            Some(false) => INPUT_ZERO,
            None => INPUT_DONT_CARE,
        };
        set_symbol(cube, var, code);
    }

    /// Value of output `bit`; `None` for don't care
    pub fn output(&self, cube: &[Word], bit: usize) -> Option<bool> {
        match symbol(&cube[self.input_words..], bit) {
            OUTPUT_OFF => Some(false),
            OUTPUT_ON => Some(true),
            _ => None,
        }
    }

    pub fn set_output(&self, cube: &mut [Word], bit: usize, value: Option<bool>) {
        debug_assert!(bit < self.outputs, "output {} out of range", bit);
        let code = match value {
            Some(true) => OUTPUT_ON,
            Some(false) => OUTPUT_OFF,
            None => OUTPUT_DONT_CARE,
        };
        set_symbol(&mut cube[self.input_words..], bit, code);
    }

    /// True iff every input symbol intersects and some output bit is shared
    pub fn intersect(&self, a: &[Word], b: &[Word]) -> bool {
        let n = self.input_words;
        for i in 0..n {
            let r = a[i] & b[i];
            if ((r << 1) | r) & MASK10 != MASK10 {
                return false;
            }
        }
        (n..self.words()).any(|i| a[i] & b[i] != 0)
    }

    /// True iff `b` is a subset of `a`, word by word
    pub fn covers(&self, a: &[Word], b: &[Word]) -> bool {
        a[..self.words()]
            .iter()
            .zip(&b[..self.words()])
            .all(|(x, y)| x & y == *y)
    }

    pub fn absorb(&self, a: &[Word], b: &[Word]) -> Absorption {
        match (self.covers(a, b), self.covers(b, a)) {
            (true, true) => Absorption::Equal,
            (true, false) => Absorption::FirstCovers,
            (false, true) => Absorption::SecondCovers,
            (false, false) => Absorption::Neither,
        }
    }

    /// How `merged` relates to the two cubes it came from
    pub fn cover_relation(&self, merged: &[Word], first: &[Word], second: &[Word]) -> CoverRelation {
        CoverRelation::from_coverage(self.covers(merged, first), self.covers(merged, second))
    }

    /// Merge two cubes that are adjacent on `var`
    ///
    /// The only empty input intersection allowed is at `var`, which becomes
    /// don't care in the result. Outputs are intersected and the product fails
    /// when nothing is left of them.
    pub fn star_product(&self, a: &[Word], b: &[Word], var: usize) -> Option<Cube> {
        let var_word = var / SYMBOLS_PER_WORD;
        let var_mask11 = variable_mask(var);
        let var_mask10 = var_mask11 & MASK10;

        let mut words = Vec::with_capacity(self.words());
        for i in 0..self.input_words {
            let mut r = a[i] & b[i];
            let present = ((r << 1) | r) & MASK10;
            if present != MASK10 {
                if i != var_word || (present | var_mask10) != MASK10 {
                    return None;
                }
                r |= var_mask11;
            }
            words.push(r);
        }

        let mut any_output = false;
        for i in self.input_words..self.words() {
            let r = a[i] & b[i];
            any_output |= r != 0;
            words.push(r);
        }

        any_output.then(|| Cube::from_words(words))
    }

    fn outputs_of<'a>(&self, cube: &'a [Word]) -> &'a [Word] {
        &cube[self.input_words..self.words()]
    }

    fn outputs_of_mut<'a>(&self, cube: &'a mut [Word]) -> &'a mut [Word] {
        let end = self.words();
        &mut cube[self.input_words..end]
    }

    /// True iff no output bit is set
    pub fn output_is_empty(&self, cube: &[Word]) -> bool {
        self.outputs_of(cube).iter().all(|w| *w == 0)
    }

    /// True iff some output is don't care
    pub fn has_dont_care_output(&self, cube: &[Word]) -> bool {
        self.outputs_of(cube).iter().any(|w| w & MASK10 != 0)
    }

    /// True iff some output is exactly `1`
    ///
    /// Don't care outputs and the transient `10` code left by subtraction do
    /// not count.
    pub fn has_do_care_output(&self, cube: &[Word]) -> bool {
        self.outputs_of(cube)
            .iter()
            .any(|w| w & !(w >> 1) & MASK01 != 0)
    }

    /// Keep only the don't care outputs, as `11`
    pub fn keep_dont_care_outputs(&self, cube: &mut [Word]) {
        for w in self.outputs_of_mut(cube) {
            let r = *w & MASK10;
            *w = r | (r >> 1);
        }
    }

    /// Turn every don't care output into `1`
    pub fn dont_care_to_do_care(&self, cube: &mut [Word]) {
        for w in self.outputs_of_mut(cube) {
            *w |= *w >> 1;
            *w &= MASK01;
        }
    }

    /// Clear every output that is not exactly `1`
    pub fn drop_dont_care_outputs(&self, cube: &mut [Word]) {
        for w in self.outputs_of_mut(cube) {
            *w |= (*w >> 1) & MASK01;
            *w = ((*w >> 1) ^ *w) & MASK01;
        }
    }

    pub fn or_outputs(&self, dst: &mut [Word], src: &[Word]) {
        let src = self.outputs_of(src);
        for (d, s) in self.outputs_of_mut(dst).iter_mut().zip(src) {
            *d |= s;
        }
    }

    pub fn clear_outputs(&self, cube: &mut [Word]) {
        self.outputs_of_mut(cube).fill(0);
    }

    /// Number of specified input literals
    pub fn input_cost(&self, cube: &[Word]) -> u32 {
        let dont_cares: u32 = cube[..self.input_words]
            .iter()
            .map(|w| (w & (w >> 1) & MASK01).count_ones())
            .sum();
        let padding = (self.input_words * SYMBOLS_PER_WORD - self.inputs) as u32;
        self.inputs as u32 - (dont_cares - padding)
    }

    /// Number of outputs set to exactly `1`
    pub fn output_cost(&self, cube: &[Word]) -> u32 {
        self.outputs_of(cube)
            .iter()
            .map(|w| (w & !(w >> 1) & MASK01).count_ones())
            .sum()
    }
}
