//! # Gazetteers — Listas de Entidades Conhecidas
//!
//! O primeiro estágio heurístico consulta listas estáticas de fabricantes,
//! produtos (incluindo sistemas operacionais) e termos relevantes de
//! vulnerabilidade. A consulta é por **frase exata, sem diferenciar
//! maiúsculas**, sobre janelas de 1, 2 e 3 tokens.
//!
//! ## Por que gazetteers antes do modelo estatístico?
//!
//! O modelo aprende padrões do corpus, mas listas curadas garantem alta
//! precisão para nomes conhecidos ("Microsoft" é sempre `sw.vendor`).
//! O rótulo heurístico resultante também alimenta as regras contextuais
//! do estágio seguinte.
//!
//! ## Ordem de prioridade
//!
//! Unigramas primeiro (por token: fabricantes, depois produtos, depois
//! termos), então bigramas e por fim trigramas ao longo da sentença.
//! Uma janela maior **nunca sobrescreve** um rótulo não-`O` já atribuído
//! por uma janela menor.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ResourceError;
use crate::sentence::Sentence;
use crate::tagger::{EntityType, HeuristicMethod};

/// Uma entrada de gazetteer: nome canônico mais apelidos.
///
/// O formato JSON segue o export estilo Freebase das listas (array
/// `result`, apelidos sob a chave `/common/topic/alias`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GazetteerEntry {
    pub name: String,
    #[serde(rename = "/common/topic/alias", default)]
    pub aliases: Vec<String>,
}

impl GazetteerEntry {
    pub fn new(name: impl Into<String>, aliases: &[&str]) -> Self {
        Self {
            name: name.into(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GazetteerFile {
    result: Vec<GazetteerEntry>,
}

/// Uma lista de entidades com consulta O(1) por frase.
///
/// As entradas originais são preservadas; um índice em minúsculas cobre
/// nomes canônicos e apelidos. A lista é somente-leitura depois da
/// inicialização do extrator.
#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    list_type: String,
    entries: Vec<GazetteerEntry>,
    index: HashSet<String>,
}

impl Gazetteer {
    pub fn new(list_type: impl Into<String>) -> Self {
        Self {
            list_type: list_type.into(),
            entries: Vec::new(),
            index: HashSet::new(),
        }
    }

    pub fn from_entries(list_type: impl Into<String>, entries: Vec<GazetteerEntry>) -> Self {
        let mut gazetteer = Self::new(list_type);
        for entry in entries {
            gazetteer.add_entry(entry);
        }
        gazetteer
    }

    pub fn add_entry(&mut self, entry: GazetteerEntry) {
        self.index.insert(entry.name.to_lowercase());
        for alias in &entry.aliases {
            self.index.insert(alias.to_lowercase());
        }
        self.entries.push(entry);
    }

    /// Funde outra lista nesta (ex: sistemas operacionais dentro de produtos).
    pub fn add_entries(&mut self, other: Gazetteer) {
        for entry in other.entries {
            self.add_entry(entry);
        }
    }

    /// Consulta por frase exata, sem diferenciar maiúsculas, contra o nome
    /// canônico ou qualquer apelido.
    pub fn contains(&self, phrase: &str) -> bool {
        self.index.contains(&phrase.to_lowercase())
    }

    pub fn list_type(&self) -> &str {
        &self.list_type
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Carrega uma lista de gazetteer de um arquivo JSON.
///
/// Falha de leitura ou de formato é fatal para a inicialização do extrator
/// (ver [`ResourceError`]).
pub fn load_gazetteer(path: &Path, list_type: &str) -> Result<Gazetteer, ResourceError> {
    let file = File::open(path).map_err(|source| ResourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: GazetteerFile =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| ResourceError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    let gazetteer = Gazetteer::from_entries(list_type, parsed.result);
    info!(
        list_type,
        entries = gazetteer.len(),
        path = %path.display(),
        "gazetteer carregado"
    );
    Ok(gazetteer)
}

/// Carrega uma lista de termos relevantes de um arquivo texto
/// (um termo ou frase por linha), normalizada para minúsculas.
pub fn load_term_list(path: &Path) -> Result<HashSet<String>, ResourceError> {
    let file = File::open(path).map_err(|source| ResourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut terms = HashSet::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|source| ResourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let term = line.trim();
        if !term.is_empty() {
            terms.insert(term.to_lowercase());
        }
    }
    info!(terms = terms.len(), path = %path.display(), "lista de termos carregada");
    Ok(terms)
}

/// O conjunto completo de listas usado pelo casador (matcher).
#[derive(Debug, Clone, Default)]
pub struct GazetteerSet {
    vendors: Gazetteer,
    products: Gazetteer,
    relevant_terms: HashSet<String>,
}

impl GazetteerSet {
    /// Monta o conjunto a partir de listas já carregadas.
    ///
    /// Os nomes de sistemas operacionais são tratados como produtos, por
    /// isso a lista de SO é fundida na de produtos aqui.
    pub fn new(
        vendors: Gazetteer,
        mut products: Gazetteer,
        operating_systems: Gazetteer,
        relevant_terms: HashSet<String>,
    ) -> Self {
        products.add_entries(operating_systems);
        Self {
            vendors,
            products,
            relevant_terms,
        }
    }

    /// Carrega as quatro listas dos caminhos dados. Qualquer falha é fatal.
    pub fn from_files(
        vendors_path: &Path,
        products_path: &Path,
        os_path: &Path,
        terms_path: &Path,
    ) -> Result<Self, ResourceError> {
        let vendors = load_gazetteer(vendors_path, &EntityType::sw_vendor().to_string())?;
        let products = load_gazetteer(products_path, &EntityType::sw_product().to_string())?;
        let operating_systems = load_gazetteer(os_path, &EntityType::sw_product().to_string())?;
        let relevant_terms = load_term_list(terms_path)?;
        Ok(Self::new(vendors, products, operating_systems, relevant_terms))
    }

    fn lookup(&self, phrase: &str) -> Option<EntityType> {
        if self.vendors.contains(phrase) {
            Some(EntityType::sw_vendor())
        } else if self.products.contains(phrase) {
            Some(EntityType::sw_product())
        } else if self.relevant_terms.contains(&phrase.to_lowercase()) {
            Some(EntityType::vuln_description())
        } else {
            None
        }
    }

    /// Atribui rótulos heurísticos preliminares aos tokens da sentença.
    ///
    /// A operação é idempotente: nenhum acerto sobrescreve um rótulo
    /// não-`O` já presente, então rodar duas vezes produz o mesmo
    /// resultado que rodar uma vez.
    pub fn annotate(&self, sentence: &mut Sentence) {
        let len = sentence.tokens.len();

        // unigramas
        for i in 0..len {
            let label = self.lookup(&sentence.tokens[i].word);
            if let Some(label) = label {
                self.label_window(sentence, i, 1, label);
            }
        }

        // bigramas
        for i in 0..len.saturating_sub(1) {
            let phrase = format!("{} {}", sentence.tokens[i].word, sentence.tokens[i + 1].word);
            if let Some(label) = self.lookup(&phrase) {
                self.label_window(sentence, i, 2, label);
            }
        }

        // trigramas
        for i in 0..len.saturating_sub(2) {
            let phrase = format!(
                "{} {} {}",
                sentence.tokens[i].word,
                sentence.tokens[i + 1].word,
                sentence.tokens[i + 2].word
            );
            if let Some(label) = self.lookup(&phrase) {
                self.label_window(sentence, i, 3, label);
            }
        }
    }

    fn label_window(&self, sentence: &mut Sentence, start: usize, len: usize, label: EntityType) {
        for token in sentence.tokens[start..start + len].iter_mut() {
            if token.heuristic_label.is_outside() {
                token.heuristic_label = label.clone();
                token.heuristic_method = HeuristicMethod::Dictionary;
            }
        }
    }
}
