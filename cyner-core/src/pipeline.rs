//! # Pipeline de Extração — Orquestrador
//!
//! Conecta os estágios na ordem fixa do sistema:
//!
//! 1. **Gazetteers** ([`crate::gazetteer`]): rótulos heurísticos por listas.
//! 2. **Regras contextuais** ([`crate::regex_rules`]): revisão por janelas.
//! 3. **Mapa de treinamento** ([`crate::memo`]): preenche o que sobrou `O`.
//! 4. **Rotulador sequencial** ([`crate::labeler`]): I-O-B + rótulo de
//!    domínio com score.
//! 5. **Montagem de menções** ([`crate::mention`]).
//!
//! Todos os recursos (listas, regras, mapa, pesos) são imutáveis depois da
//! construção e compartilhados por referência; o processamento de cada
//! sentença é uma computação pura sobre os próprios tokens. Por isso
//! sentenças independentes podem ser anotadas em paralelo sem nenhuma
//! coordenação — dentro de uma sentença, porém, o rotulador guloso tem
//! dependência esquerda→direita e é estritamente sequencial.

use std::path::PathBuf;

use rayon::prelude::*;
use tracing::debug;

use crate::error::ResourceError;
use crate::gazetteer::GazetteerSet;
use crate::labeler::SequenceLabeler;
use crate::memo::TokenLabelMap;
use crate::mention::assemble_mentions;
use crate::perceptron::PerceptronModel;
use crate::regex_rules::RuleSet;
use crate::sentence::{Sentence, Sentences};

/// Caminhos dos recursos externos carregados na inicialização.
#[derive(Debug, Clone)]
pub struct ResourcePaths {
    pub vendors: PathBuf,
    pub products: PathBuf,
    pub operating_systems: PathBuf,
    pub relevant_terms: PathBuf,
    pub token_label_map: PathBuf,
    pub iob_model: PathBuf,
    pub domain_model: PathBuf,
}

/// O extrator de entidades do domínio cibernético.
///
/// Construído uma única vez com todos os recursos carregados (construção
/// por injeção explícita — nenhum estado global); depois disso é
/// somente-leitura e pode ser compartilhado entre threads.
///
/// # Exemplo
/// ```
/// use cyner_core::model::demo_extractor;
/// use cyner_core::{Sentence, Sentences};
///
/// let extractor = demo_extractor();
/// let mut document = Sentences::new(vec![Sentence::from_pairs(&[
///     ("Microsoft", "NNP"),
///     ("Windows", "NNP"),
/// ])]);
/// extractor.annotate(&mut document);
/// assert!(!document.sentences[0].mentions.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct EntityExtractor {
    gazetteers: GazetteerSet,
    rules: RuleSet,
    memo: TokenLabelMap,
    labeler: SequenceLabeler,
}

impl EntityExtractor {
    /// Monta o extrator a partir de recursos já carregados.
    pub fn new(
        gazetteers: GazetteerSet,
        rules: RuleSet,
        memo: TokenLabelMap,
        iob_model: PerceptronModel,
        domain_model: PerceptronModel,
    ) -> Self {
        Self {
            gazetteers,
            rules,
            memo,
            labeler: SequenceLabeler::new(iob_model, domain_model),
        }
    }

    /// Carrega todos os recursos dos caminhos dados.
    ///
    /// Qualquer recurso ausente ou malformado aborta a construção — o
    /// extrator nunca roda com uma lista silenciosamente vazia.
    pub fn from_files(paths: &ResourcePaths) -> Result<Self, ResourceError> {
        let gazetteers = GazetteerSet::from_files(
            &paths.vendors,
            &paths.products,
            &paths.operating_systems,
            &paths.relevant_terms,
        )?;
        let memo = TokenLabelMap::load(&paths.token_label_map)?;
        let iob_model = PerceptronModel::load(&paths.iob_model)?;
        let domain_model = PerceptronModel::load(&paths.domain_model)?;
        Ok(Self::new(
            gazetteers,
            RuleSet::default(),
            memo,
            iob_model,
            domain_model,
        ))
    }

    /// Executa o pipeline completo sobre uma sentença.
    pub fn annotate_sentence(&self, sentence: &mut Sentence, sentence_index: usize) {
        self.gazetteers.annotate(sentence);
        self.rules.annotate(sentence);
        self.memo.annotate(sentence);
        self.labeler.label(sentence);
        sentence.mentions = assemble_mentions(&sentence.tokens, sentence_index);
        debug!(
            sentence_index,
            tokens = sentence.tokens.len(),
            mentions = sentence.mentions.len(),
            "sentença anotada"
        );
    }

    /// Anota todas as sentenças do documento, em paralelo.
    ///
    /// Uma tarefa por sentença; nenhum bloqueio é necessário porque os
    /// recursos são imutáveis e as sentenças não compartilham estado.
    pub fn annotate(&self, document: &mut Sentences) {
        document
            .sentences
            .par_iter_mut()
            .enumerate()
            .for_each(|(index, sentence)| self.annotate_sentence(sentence, index));
    }

    /// Anota e serializa o documento como JSON.
    pub fn annotate_to_json(&self, document: &mut Sentences) -> serde_json::Result<String> {
        self.annotate(document);
        document.to_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gazetteer::{Gazetteer, GazetteerEntry};
    use crate::tagger::{EntityType, HeuristicMethod};
    use std::collections::HashSet;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    /// Extrator mínimo: "Windows" na lista de produtos, regras padrão,
    /// mapa vazio e modelos que devolvem sempre "O".
    fn minimal_extractor() -> EntityExtractor {
        let vendors = Gazetteer::new("sw.vendor");
        let products = Gazetteer::from_entries(
            "sw.product",
            vec![GazetteerEntry::new("Windows", &[])],
        );
        let os = Gazetteer::new("sw.product");
        let gazetteers = GazetteerSet::new(vendors, products, os, HashSet::new());
        EntityExtractor::new(
            gazetteers,
            RuleSet::default(),
            TokenLabelMap::new(),
            PerceptronModel::new(strings(&["O"])),
            PerceptronModel::new(strings(&["O"])),
        )
    }

    #[test]
    fn test_windows_before_sp1_end_to_end() {
        let extractor = minimal_extractor();
        let mut sentence = Sentence::from_pairs(&[
            ("Windows", "NNP"),
            ("7", "CD"),
            ("before", "IN"),
            ("SP1", "NN"),
        ]);
        extractor.annotate_sentence(&mut sentence, 0);

        assert_eq!(sentence.tokens[0].heuristic_label, EntityType::sw_product());
        assert_eq!(sentence.tokens[1].heuristic_label, EntityType::sw_product());
        assert_eq!(sentence.tokens[2].heuristic_label, EntityType::sw_version());
        assert_eq!(sentence.tokens[3].heuristic_label, EntityType::sw_version());

        // duas menções: produto nos tokens 0-1, versão nos tokens 2-3
        assert_eq!(sentence.mentions.len(), 2);
        assert_eq!((sentence.mentions[0].start, sentence.mentions[0].end), (0, 2));
        assert_eq!(sentence.mentions[0].entity_type, EntityType::sw_product());
        assert_eq!((sentence.mentions[1].start, sentence.mentions[1].end), (2, 4));
        assert_eq!(sentence.mentions[1].entity_type, EntityType::sw_version());
    }

    #[test]
    fn test_zero_signal_round_trip() {
        let extractor = minimal_extractor();
        let mut sentence = Sentence::from_pairs(&[
            ("the", "DT"),
            ("report", "NN"),
            ("was", "VBD"),
            ("published", "VBN"),
        ]);
        extractor.annotate_sentence(&mut sentence, 0);

        assert!(sentence.mentions.is_empty());
        for token in &sentence.tokens {
            assert!(token.domain_label.is_outside());
        }
    }

    #[test]
    fn test_heuristic_method_invariant() {
        let extractor = minimal_extractor();
        let mut sentence = Sentence::from_pairs(&[
            ("Windows", "NNP"),
            ("7", "CD"),
            ("crashed", "VBD"),
            ("CVE-2014-1234", "NN"),
        ]);
        extractor.annotate_sentence(&mut sentence, 0);

        for token in &sentence.tokens {
            // método != None implica rótulo != O, e vice-versa
            assert_eq!(
                token.heuristic_method == HeuristicMethod::None,
                token.heuristic_label.is_outside(),
                "token '{}' viola a invariante de proveniência",
                token.word
            );
        }
        assert_eq!(
            sentence.tokens[0].heuristic_method,
            HeuristicMethod::Dictionary
        );
        assert_eq!(sentence.tokens[3].heuristic_method, HeuristicMethod::Regex);
    }

    #[test]
    fn test_memo_fills_after_rules() {
        let mut memo = TokenLabelMap::new();
        memo.add("Heartbleed", EntityType::vuln_name());
        let extractor = EntityExtractor::new(
            GazetteerSet::new(
                Gazetteer::new("sw.vendor"),
                Gazetteer::new("sw.product"),
                Gazetteer::new("sw.product"),
                HashSet::new(),
            ),
            RuleSet::default(),
            memo,
            PerceptronModel::new(strings(&["O"])),
            PerceptronModel::new(strings(&["O"])),
        );

        let mut sentence = Sentence::from_pairs(&[("Heartbleed", "NNP")]);
        extractor.annotate_sentence(&mut sentence, 0);
        assert_eq!(
            sentence.tokens[0].heuristic_method,
            HeuristicMethod::TrainingMap
        );
        assert_eq!(sentence.tokens[0].domain_label, EntityType::vuln_name());
    }

    #[test]
    fn test_parallel_annotation_matches_sequential() {
        let extractor = minimal_extractor();
        let pairs: Vec<(&str, &str)> = vec![
            ("Windows", "NNP"),
            ("7", "CD"),
            ("before", "IN"),
            ("SP1", "NN"),
        ];

        let mut parallel = Sentences::new(vec![
            Sentence::from_pairs(&pairs);
            8
        ]);
        extractor.annotate(&mut parallel);

        let mut sequential = Sentence::from_pairs(&pairs);
        extractor.annotate_sentence(&mut sequential, 0);

        for (index, sentence) in parallel.sentences.iter().enumerate() {
            assert_eq!(sentence.mentions.len(), sequential.mentions.len());
            for (a, b) in sentence.tokens.iter().zip(sequential.tokens.iter()) {
                assert_eq!(a.domain_label, b.domain_label);
                assert_eq!(a.iob, b.iob);
            }
            for mention in &sentence.mentions {
                assert_eq!(mention.sentence_index, index);
            }
        }
    }

    #[test]
    fn test_from_files_missing_resource_is_fatal() {
        let paths = ResourcePaths {
            vendors: PathBuf::from("/nonexistent/vendors.json"),
            products: PathBuf::from("/nonexistent/products.json"),
            operating_systems: PathBuf::from("/nonexistent/os.json"),
            relevant_terms: PathBuf::from("/nonexistent/terms.txt"),
            token_label_map: PathBuf::from("/nonexistent/map.json"),
            iob_model: PathBuf::from("/nonexistent/iob.json"),
            domain_model: PathBuf::from("/nonexistent/domain.json"),
        };
        assert!(matches!(
            EntityExtractor::from_files(&paths),
            Err(ResourceError::Io { .. })
        ));
    }
}
