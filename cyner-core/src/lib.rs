//! # cyner-core — Extração de Entidades do Domínio Cibernético
//!
//! Este crate implementa o motor de rotulagem de entidades para textos de
//! segurança da informação: fabricantes e produtos de software, versões,
//! nomes de arquivo e de função, e identificadores/descrições de
//! vulnerabilidades. A entrada já chega dividida em sentenças, tokenizada e
//! etiquetada com classes gramaticais por colaboradores externos — aqui
//! mora apenas o núcleo de decisão.
//!
//! ## Arquitetura do Pipeline
//!
//! Cada sentença atravessa os estágios em ordem fixa:
//!
//! 1.  **Gazetteers** ([`gazetteer`]): consulta de janelas de 1 a 3 tokens
//!     contra listas de fabricantes, produtos/SO e termos relevantes.
//! 2.  **Regras contextuais** ([`regex_rules`]): tabela ordenada de regras
//!     de janela (padrões de palavra + padrões de rótulo) com política de
//!     primeira-regra-vence por posição.
//! 3.  **Mapa de treinamento** ([`memo`]): tokens que tiveram rótulo único
//!     e recorrente no treinamento preenchem o que restou sem rótulo.
//! 4.  **Rotulador sequencial** ([`labeler`]): dois perceptrons médios em
//!     cadeia, gulosos, da esquerda para a direita — primeiro as tags
//!     I-O-B, depois o rótulo de domínio com score bruto.
//! 5.  **Menções** ([`mention`]): trechos contíguos de mesmo rótulo viram
//!     menções estruturadas com id único.
//!
//! Os recursos (listas, regras, mapa, pesos) são imutáveis depois da
//! inicialização e compartilhados por referência; sentenças independentes
//! são anotadas em paralelo ([`pipeline`]).
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use cyner_core::model::demo_extractor;
//! use cyner_core::{Sentence, Sentences};
//!
//! // 1. Instancia o extrator (recursos de demonstração embutidos)
//! let extractor = demo_extractor();
//!
//! // 2. Sentença já tokenizada e com POS
//! let mut document = Sentences::new(vec![Sentence::from_pairs(&[
//!     ("Microsoft", "NNP"),
//!     ("Windows", "NNP"),
//!     ("7", "CD"),
//!     ("before", "IN"),
//!     ("SP1", "NN"),
//! ])]);
//!
//! // 3. Executa o pipeline completo
//! extractor.annotate(&mut document);
//!
//! // 4. Exibe as menções encontradas
//! let sentence = &document.sentences[0];
//! for mention in &sentence.mentions {
//!     println!(
//!         "{} ({}) em {}..{}",
//!         mention.phrase(sentence),
//!         mention.entity_type,
//!         mention.start,
//!         mention.end
//!     );
//! }
//! assert_eq!(sentence.mentions.len(), 3);
//! ```

pub mod error;
pub mod features;
pub mod gazetteer;
pub mod labeler;
pub mod memo;
pub mod mention;
pub mod model;
pub mod perceptron;
pub mod pipeline;
pub mod regex_rules;
pub mod sentence;
pub mod tagger;

pub use error::ResourceError;
pub use mention::EntityMention;
pub use pipeline::{EntityExtractor, ResourcePaths};
pub use sentence::{Sentence, Sentences, Token};
pub use tagger::{EntityType, HeuristicMethod};
