//! # Montagem de Menções de Entidade
//!
//! O último estágio transforma os rótulos finais token-a-token em menções
//! estruturadas: trechos contíguos de tokens com o mesmo `(tipo, subtipo)`.
//!
//! A varredura é da esquerda para a direita. Um token não-`O` abre uma
//! menção candidata cobrindo só ele — a menos que a menção imediatamente
//! anterior tenha o mesmo `(tipo, subtipo)` **e** sua extensão termine
//! exatamente onde este token começa; nesse caso a extensão é estendida em
//! vez de abrir uma nova menção. A menção fecha quando a sequência de
//! rótulos iguais termina, e é imutável depois disso.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::sentence::{Sentence, Token};
use crate::tagger::EntityType;

// Contador global de ids, único por processo.
static NEXT_MENTION_ID: AtomicU64 = AtomicU64::new(1);

/// Um trecho contíguo de tokens com um único rótulo de entidade.
///
/// A menção guarda o índice da sentença dona (referência não-proprietária,
/// só para contexto) e a extensão em offsets de token, com `start`
/// inclusivo e `end` exclusivo. O head coincide com a extensão.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMention {
    /// Identificador único no processo.
    pub id: u64,
    /// Índice da sentença dona dentro do documento.
    pub sentence_index: usize,
    /// Offset do primeiro token (inclusivo).
    pub start: usize,
    /// Offset após o último token (exclusivo).
    pub end: usize,
    /// O rótulo `(tipo, subtipo)` da menção.
    pub entity_type: EntityType,
}

impl EntityMention {
    fn open(sentence_index: usize, start: usize, entity_type: EntityType) -> Self {
        Self {
            id: NEXT_MENTION_ID.fetch_add(1, Ordering::Relaxed),
            sentence_index,
            start,
            end: start + 1,
            entity_type,
        }
    }

    /// O texto da menção, juntando as palavras cobertas com espaço.
    pub fn phrase(&self, sentence: &Sentence) -> String {
        sentence.tokens[self.start..self.end]
            .iter()
            .map(|t| t.word.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Varre os rótulos de domínio finais e monta a lista ordenada de menções.
///
/// A ordem de saída é a ordem do primeiro token de cada menção. Uma
/// sequência máxima de N tokens consecutivos com o mesmo rótulo produz
/// exatamente uma menção cobrindo os N tokens.
pub fn assemble_mentions(tokens: &[Token], sentence_index: usize) -> Vec<EntityMention> {
    let mut mentions: Vec<EntityMention> = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        if token.domain_label.is_outside() {
            continue;
        }
        if let Some(last) = mentions.last_mut() {
            if last.entity_type == token.domain_label && last.end == i {
                last.end = i + 1;
                continue;
            }
        }
        mentions.push(EntityMention::open(
            sentence_index,
            i,
            token.domain_label.clone(),
        ));
    }

    mentions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentence::Sentence;

    fn labeled_sentence(labels: &[(&str, EntityType)]) -> Sentence {
        let mut sentence = Sentence::from_pairs(
            &labels.iter().map(|(w, _)| (*w, "NN")).collect::<Vec<_>>(),
        );
        for (token, (_, label)) in sentence.tokens.iter_mut().zip(labels.iter()) {
            token.domain_label = label.clone();
        }
        sentence
    }

    #[test]
    fn test_maximal_run_yields_single_mention() {
        let sentence = labeled_sentence(&[
            ("Vanilla", EntityType::sw_product()),
            ("Forums", EntityType::sw_product()),
            ("before", EntityType::sw_version()),
            ("2.0.18.8", EntityType::sw_version()),
        ]);
        let mentions = assemble_mentions(&sentence.tokens, 0);

        assert_eq!(mentions.len(), 2);
        assert_eq!((mentions[0].start, mentions[0].end), (0, 2));
        assert_eq!(mentions[0].entity_type, EntityType::sw_product());
        assert_eq!((mentions[1].start, mentions[1].end), (2, 4));
        assert_eq!(mentions[1].entity_type, EntityType::sw_version());
        assert_eq!(mentions[0].phrase(&sentence), "Vanilla Forums");
        assert_eq!(mentions[1].phrase(&sentence), "before 2.0.18.8");
    }

    #[test]
    fn test_outside_gap_splits_mentions() {
        let sentence = labeled_sentence(&[
            ("Windows", EntityType::sw_product()),
            ("has", EntityType::outside()),
            ("Java", EntityType::sw_product()),
        ]);
        let mentions = assemble_mentions(&sentence.tokens, 0);

        assert_eq!(mentions.len(), 2);
        assert_eq!((mentions[0].start, mentions[0].end), (0, 1));
        assert_eq!((mentions[1].start, mentions[1].end), (2, 3));
    }

    #[test]
    fn test_adjacent_different_types_open_new_mention() {
        let sentence = labeled_sentence(&[
            ("Microsoft", EntityType::sw_vendor()),
            ("Windows", EntityType::sw_product()),
        ]);
        let mentions = assemble_mentions(&sentence.tokens, 0);

        assert_eq!(mentions.len(), 2);
        assert_eq!(mentions[0].entity_type, EntityType::sw_vendor());
        assert_eq!(mentions[1].entity_type, EntityType::sw_product());
    }

    #[test]
    fn test_single_token_run() {
        let sentence = labeled_sentence(&[("CVE-2014-1234", EntityType::vuln_cve())]);
        let mentions = assemble_mentions(&sentence.tokens, 0);
        assert_eq!(mentions.len(), 1);
        assert_eq!((mentions[0].start, mentions[0].end), (0, 1));
    }

    #[test]
    fn test_all_outside_yields_no_mentions() {
        let sentence = labeled_sentence(&[
            ("nothing", EntityType::outside()),
            ("here", EntityType::outside()),
        ]);
        assert!(assemble_mentions(&sentence.tokens, 0).is_empty());
    }

    #[test]
    fn test_mention_ids_are_unique() {
        let sentence = labeled_sentence(&[
            ("a", EntityType::sw_product()),
            ("b", EntityType::sw_version()),
            ("c", EntityType::sw_vendor()),
        ]);
        let mentions = assemble_mentions(&sentence.tokens, 0);
        let mut ids: Vec<u64> = mentions.iter().map(|m| m.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }
}
