//! # Mapa Token→Rótulo de Treinamento
//!
//! Durante o treinamento, tokens cujo rótulo verdadeiro foi o **mesmo em
//! todas as ocorrências** são memorizados em um mapa simples. Na inferência,
//! o mapa preenche tokens que nenhuma outra heurística cobriu.
//!
//! O mapa é somente-leitura na inferência; os métodos de construção
//! ([`TokenLabelMap::check_labels`], [`TokenLabelMap::clean`]) existem para
//! o pipeline de treinamento, que vive fora deste crate.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ResourceError;
use crate::sentence::Sentence;
use crate::tagger::{EntityType, HeuristicMethod};

/// Mapa de texto exato de token para um único rótulo de entidade.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenLabelMap {
    labels: HashMap<String, EntityType>,
}

impl TokenLabelMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Carrega o mapa serializado em JSON. Falha de leitura é fatal.
    pub fn load(path: &Path) -> Result<Self, ResourceError> {
        let file = File::open(path).map_err(|source| ResourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let map: TokenLabelMap =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| {
                ResourceError::Json {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
        info!(tokens = map.len(), path = %path.display(), "mapa token-rótulo carregado");
        Ok(map)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.labels.contains_key(token)
    }

    pub fn get(&self, token: &str) -> Option<&EntityType> {
        self.labels.get(token)
    }

    pub fn add(&mut self, token: impl Into<String>, label: EntityType) {
        self.labels.insert(token.into(), label);
    }

    /// Registra uma ocorrência rotulada vista no treinamento.
    ///
    /// Na primeira ocorrência o rótulo é memorizado; se uma ocorrência
    /// posterior discordar, o token é descartado do mapa — só sobrevivem
    /// tokens inequívocos.
    pub fn check_labels(&mut self, token: &str, new_label: EntityType) {
        match self.labels.get(token) {
            None => {
                self.labels.insert(token.to_string(), new_label);
            }
            Some(current) if *current != new_label => {
                self.labels.remove(token);
            }
            Some(_) => {}
        }
    }

    /// Remove entradas mapeadas para a sentinela `O` (não carregam sinal).
    pub fn clean(&mut self) {
        self.labels.retain(|_, label| !label.is_outside());
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Preenche tokens ainda rotulados `O` após gazetteers e regras.
    pub fn annotate(&self, sentence: &mut Sentence) {
        for token in sentence.tokens.iter_mut() {
            if token.heuristic_label.is_outside() {
                if let Some(label) = self.labels.get(&token.word) {
                    token.heuristic_label = label.clone();
                    token.heuristic_method = HeuristicMethod::TrainingMap;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotate_fills_only_outside_tokens() {
        let mut map = TokenLabelMap::new();
        map.add("Heartbleed", EntityType::vuln_name());

        let mut sentence = Sentence::from_pairs(&[("Heartbleed", "NNP"), ("bug", "NN")]);
        // simula um token já rotulado por estágio anterior
        sentence.tokens[1].heuristic_label = EntityType::vuln_description();
        sentence.tokens[1].heuristic_method = HeuristicMethod::Dictionary;
        map.annotate(&mut sentence);

        assert_eq!(sentence.tokens[0].heuristic_label, EntityType::vuln_name());
        assert_eq!(
            sentence.tokens[0].heuristic_method,
            HeuristicMethod::TrainingMap
        );
        // o rótulo de dicionário permanece intocado
        assert_eq!(
            sentence.tokens[1].heuristic_method,
            HeuristicMethod::Dictionary
        );
    }

    #[test]
    fn test_check_labels_drops_ambiguous_tokens() {
        let mut map = TokenLabelMap::new();
        map.check_labels("Java", EntityType::sw_product());
        assert!(map.contains("Java"));

        // segunda ocorrência com rótulo diferente → descartado
        map.check_labels("Java", EntityType::sw_vendor());
        assert!(!map.contains("Java"));
    }

    #[test]
    fn test_clean_removes_outside_entries() {
        let mut map = TokenLabelMap::new();
        map.check_labels("the", EntityType::outside());
        map.check_labels("Windows", EntityType::sw_product());
        map.clean();

        assert!(!map.contains("the"));
        assert!(map.contains("Windows"));
    }
}
