//! # Modelo de Dados — Token, Sentença e Documento
//!
//! O pipeline consome sentenças já tokenizadas e etiquetadas com classe
//! gramatical (POS) por colaboradores externos. Cada [`Token`] nasce com os
//! campos de anotação vazios e é **mutado no lugar** por cada estágio:
//!
//! 1. rótulo heurístico (gazetteer → regras regex → mapa de treinamento);
//! 2. tag I-O-B (estágio A do rotulador sequencial);
//! 3. rótulo de domínio + score (estágio B).
//!
//! A ordem dos tokens é fixada na construção e nunca muda.

use serde::{Deserialize, Serialize};

use crate::mention::EntityMention;
use crate::tagger::{EntityType, HeuristicMethod, IOB_OUTSIDE};

/// Um token anotado de uma sentença.
///
/// Os campos `word` e `pos` vêm do tokenizador/etiquetador externo e são
/// somente-leitura na prática; os demais campos são preenchidos pelos
/// estágios do pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// O texto do token (ex: "Windows", "CVE-2014-1234", ",").
    pub word: String,
    /// Classe gramatical atribuída pelo etiquetador externo (ex: "NNP").
    /// O motor não valida o conjunto de tags.
    pub pos: String,
    /// Posição do token na sentença (0, 1, 2...).
    pub index: usize,
    /// Palpite heurístico preliminar (default `O`).
    pub heuristic_label: EntityType,
    /// Qual heurística produziu o palpite (default `None`).
    pub heuristic_method: HeuristicMethod,
    /// Tag I-O-B final ("B", "I" ou "O").
    pub iob: String,
    /// Rótulo de domínio final.
    pub domain_label: EntityType,
    /// Score bruto do modelo linear para o rótulo escolhido.
    /// **Não** é uma probabilidade — nenhuma normalização é aplicada.
    pub domain_score: f64,
}

impl Token {
    pub fn new(word: impl Into<String>, pos: impl Into<String>, index: usize) -> Self {
        Self {
            word: word.into(),
            pos: pos.into(),
            index,
            heuristic_label: EntityType::outside(),
            heuristic_method: HeuristicMethod::None,
            iob: IOB_OUTSIDE.to_string(),
            domain_label: EntityType::outside(),
            domain_score: 0.0,
        }
    }
}

/// Uma sentença: sequência ordenada de tokens mais as menções extraídas.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sentence {
    pub tokens: Vec<Token>,
    /// Menções de entidade montadas ao final do pipeline, na ordem do
    /// primeiro token de cada menção.
    pub mentions: Vec<EntityMention>,
}

impl Sentence {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            mentions: Vec::new(),
        }
    }

    /// Constrói uma sentença a partir de pares `(palavra, pos)`.
    ///
    /// # Exemplo
    /// ```
    /// use cyner_core::Sentence;
    ///
    /// let sentence = Sentence::from_pairs(&[("Microsoft", "NNP"), ("Windows", "NNP")]);
    /// assert_eq!(sentence.tokens.len(), 2);
    /// assert_eq!(sentence.tokens[1].word, "Windows");
    /// ```
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let tokens = pairs
            .iter()
            .enumerate()
            .map(|(i, (word, pos))| Token::new(*word, *pos, i))
            .collect();
        Self::new(tokens)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Conjunto ordenado de sentenças de um documento.
///
/// É a unidade de entrada/saída do extrator: o chamador monta as sentenças
/// (já tokenizadas e com POS) e recebe de volta os tokens anotados e as
/// menções. A forma JSON via serde é a superfície de troca com outros
/// sistemas.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sentences {
    pub sentences: Vec<Sentence>,
}

impl Sentences {
    pub fn new(sentences: Vec<Sentence>) -> Self {
        Self { sentences }
    }

    /// Serializa o documento anotado como JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
