//! # Construção de Contextos (Features) para os Modelos Lineares
//!
//! Cada token é convertido em um vetor ordenado de strings — o "contexto" —
//! consumido pelos modelos perceptron. **A ordem de emissão é parte do
//! contrato**: o classificador trata o vetor como uma tupla posicional de
//! strings, então a mesma janela precisa produzir exatamente a mesma
//! sequência no treinamento e na inferência. Por isso o esquema é um enum
//! com ordem fixa de declaração, e o contêiner é um array de tamanho fixo
//! indexado por esse enum — nunca um mapa com ordem de iteração arbitrária.
//!
//! ## Fronteiras de sentença
//!
//! Um vizinho ausente nunca é simplesmente omitido: ele é substituído pelo
//! placeholder dedicado ([`PREV_WORD`], [`NEXT_WORD`], [`POS_PLACEHOLDER`],
//! [`OUTSIDE_TAG`]) antes da construção, de modo que o vetor tenha sempre a
//! mesma forma em qualquer posição da sentença.
//!
//! ## Features compostas
//!
//! Além dos valores diretos da janela, dois pares derivados são emitidos
//! quando seus insumos existem: a concatenação das duas tags/rótulos
//! anteriores (`a__b`) e a concatenação da tag/rótulo anterior com a palavra
//! corrente (`a__palavra`).

use crate::tagger::IOB_OUTSIDE;

/// Placeholder de palavra anterior inexistente.
pub const PREV_WORD: &str = "_PREVIOUS_";
/// Placeholder de palavra seguinte inexistente.
pub const NEXT_WORD: &str = "_NEXT_";
/// Placeholder de POS para vizinhos inexistentes.
pub const POS_PLACEHOLDER: &str = "_POS_";
/// Tag I-O-B / rótulo de domínio para vizinhos inexistentes.
pub const OUTSIDE_TAG: &str = IOB_OUTSIDE;

/// Tamanho do prefixo/sufixo extraído da palavra corrente.
const AFFIX_LEN: usize = 6;

/// Esquema de features, em ordem fixa de emissão.
///
/// A ordem de declaração É a ordem do vetor; inserir uma variante no meio
/// quebra a equivalência com modelos já treinados.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// Rótulo de domínio do token duas posições antes.
    PpLabel,
    /// Rótulo de domínio do token anterior.
    PLabel,
    /// Composto: rótulos dos dois tokens anteriores (`pp__p`).
    P2Label,
    /// Tag I-O-B do token duas posições antes.
    PpIob,
    /// Tag I-O-B do token anterior.
    PIob,
    /// Tag I-O-B do token corrente.
    Iob,
    /// Tag I-O-B do token seguinte.
    NIob,
    /// Tag I-O-B do token duas posições depois.
    NnIob,
    /// Composto: tags I-O-B dos dois tokens anteriores (`pp__p`).
    P2Iob,
    /// Primeiros 6 caracteres da palavra corrente.
    Prefix,
    /// Últimos 6 caracteres da palavra corrente.
    Suffix,
    /// A palavra corrente.
    Word,
    /// Composto: rótulo anterior + palavra corrente.
    PLabelWord,
    /// Composto: tag I-O-B anterior + palavra corrente.
    PIobWord,
    PpWord,
    PWord,
    NWord,
    NnWord,
    PpPos,
    PPos,
    Pos,
    NPos,
    NnPos,
}

impl Predicate {
    pub const COUNT: usize = 23;
}

/// O contexto de um token: valores por slot do esquema, emitidos em ordem.
#[derive(Debug, Clone)]
pub struct Context {
    slots: [Option<String>; Predicate::COUNT],
}

impl Context {
    fn empty() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }

    fn put(&mut self, predicate: Predicate, value: impl Into<String>) {
        self.slots[predicate as usize] = Some(value.into());
    }

    fn get(&self, predicate: Predicate) -> Option<&str> {
        self.slots[predicate as usize].as_deref()
    }

    /// Contexto para o estágio I-O-B: palavra, afixos e POS do corrente.
    pub fn for_iob(word: &str, pos: &str) -> Self {
        let mut context = Self::empty();
        context.put_current_word(word, pos);
        context
    }

    /// Contexto para o estágio de rótulo de domínio: inclui a tag I-O-B
    /// já finalizada do token corrente.
    pub fn for_domain(word: &str, pos: &str, iob: &str) -> Self {
        let mut context = Self::empty();
        context.put_current_word(word, pos);
        context.put(Predicate::Iob, iob);
        context
    }

    fn put_current_word(&mut self, word: &str, pos: &str) {
        self.put(Predicate::Prefix, affix(word, Affix::Prefix));
        self.put(Predicate::Suffix, affix(word, Affix::Suffix));
        self.put(Predicate::Word, word);
        self.put(Predicate::Pos, pos);
    }

    /// Janela anterior do estágio I-O-B (token i-1).
    pub fn set_previous_iob(&mut self, word: &str, pos: &str, iob: &str) {
        self.put(Predicate::PWord, word);
        self.put(Predicate::PPos, pos);
        self.put(Predicate::PIob, iob);
    }

    /// Janela anterior do estágio I-O-B (token i-2).
    pub fn set_pprevious_iob(&mut self, word: &str, pos: &str, iob: &str) {
        self.put(Predicate::PpWord, word);
        self.put(Predicate::PpPos, pos);
        self.put(Predicate::PpIob, iob);
    }

    /// Janela anterior do estágio de domínio (token i-1).
    pub fn set_previous_label(&mut self, word: &str, pos: &str, iob: &str, label: &str) {
        self.put(Predicate::PWord, word);
        self.put(Predicate::PPos, pos);
        self.put(Predicate::PIob, iob);
        self.put(Predicate::PLabel, label);
    }

    /// Janela anterior do estágio de domínio (token i-2).
    pub fn set_pprevious_label(&mut self, word: &str, pos: &str, iob: &str, label: &str) {
        self.put(Predicate::PpWord, word);
        self.put(Predicate::PpPos, pos);
        self.put(Predicate::PpIob, iob);
        self.put(Predicate::PpLabel, label);
    }

    /// Janela seguinte do estágio I-O-B (token i+1).
    pub fn set_next_word(&mut self, word: &str, pos: &str) {
        self.put(Predicate::NWord, word);
        self.put(Predicate::NPos, pos);
    }

    /// Janela seguinte do estágio I-O-B (token i+2).
    pub fn set_nnext_word(&mut self, word: &str, pos: &str) {
        self.put(Predicate::NnWord, word);
        self.put(Predicate::NnPos, pos);
    }

    /// Janela seguinte do estágio de domínio (token i+1).
    pub fn set_next_iob(&mut self, word: &str, pos: &str, iob: &str) {
        self.put(Predicate::NWord, word);
        self.put(Predicate::NPos, pos);
        self.put(Predicate::NIob, iob);
    }

    /// Janela seguinte do estágio de domínio (token i+2).
    pub fn set_nnext_iob(&mut self, word: &str, pos: &str, iob: &str) {
        self.put(Predicate::NnWord, word);
        self.put(Predicate::NnPos, pos);
        self.put(Predicate::NnIob, iob);
    }

    /// Composto: tags I-O-B dos dois tokens anteriores.
    pub fn set_2previous_iob(&mut self) {
        if let (Some(pp), Some(p)) = (self.get(Predicate::PpIob), self.get(Predicate::PIob)) {
            let combined = format!("{pp}__{p}");
            self.put(Predicate::P2Iob, combined);
        }
    }

    /// Composto: tag I-O-B anterior + palavra corrente.
    pub fn set_previous_iob_and_word(&mut self) {
        if let (Some(p), Some(w)) = (self.get(Predicate::PIob), self.get(Predicate::Word)) {
            let combined = format!("{p}__{w}");
            self.put(Predicate::PIobWord, combined);
        }
    }

    /// Composto: rótulos de domínio dos dois tokens anteriores.
    pub fn set_2previous_label(&mut self) {
        if let (Some(pp), Some(p)) = (self.get(Predicate::PpLabel), self.get(Predicate::PLabel)) {
            let combined = format!("{pp}__{p}");
            self.put(Predicate::P2Label, combined);
        }
    }

    /// Composto: rótulo de domínio anterior + palavra corrente.
    pub fn set_previous_label_and_word(&mut self) {
        if let (Some(p), Some(w)) = (self.get(Predicate::PLabel), self.get(Predicate::Word)) {
            let combined = format!("{p}__{w}");
            self.put(Predicate::PLabelWord, combined);
        }
    }

    /// Emite os valores preenchidos, na ordem de declaração do esquema.
    pub fn to_vec(&self) -> Vec<String> {
        self.slots.iter().flatten().cloned().collect()
    }
}

enum Affix {
    Prefix,
    Suffix,
}

/// Primeiros/últimos [`AFFIX_LEN`] caracteres, ou a palavra toda se menor.
fn affix(word: &str, which: Affix) -> String {
    let chars: Vec<char> = word.chars().collect();
    if chars.len() <= AFFIX_LEN {
        return word.to_string();
    }
    match which {
        Affix::Prefix => chars[..AFFIX_LEN].iter().collect(),
        Affix::Suffix => chars[chars.len() - AFFIX_LEN..].iter().collect(),
    }
}
