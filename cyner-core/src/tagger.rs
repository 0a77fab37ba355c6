//! # Tipos de Entidade do Domínio Cibernético
//!
//! Define o "vocabulário" semântico do sistema: cada token recebe um rótulo
//! de domínio na forma `(tipo, subtipo)`, além da proveniência do palpite
//! heurístico que o produziu.
//!
//! ## Rótulos Reconhecidos
//!
//! | Rótulo              | Significado                  | Exemplos                       |
//! |---------------------|------------------------------|--------------------------------|
//! | `sw.vendor`         | Fabricante de software       | Microsoft, Oracle, Adobe       |
//! | `sw.product`        | Produto ou sistema           | Windows, Java SE, OpenSSL      |
//! | `sw.version`        | Versão/release/patch         | 2.0.18.8, SP1, "before 7.0.1"  |
//! | `file.name`         | Nome de arquivo              | file.php, kernel32.dll         |
//! | `function.name`     | Nome de função               | strcpy(), eval_string          |
//! | `vuln.ms`           | Boletim Microsoft            | MS14-035                       |
//! | `vuln.cve`          | Identificador CVE            | CVE-2014-1234                  |
//! | `vuln.name`         | Vulnerabilidade nomeada      | Heartbleed                     |
//! | `vuln.description`  | Descrição de vulnerabilidade | "cross-site scripting"         |
//! | `O`                 | Fora de entidade             | (qualquer outra palavra)       |

use serde::{Deserialize, Serialize};

/// Rótulo sentinela para tokens fora de qualquer entidade.
pub const OUTSIDE: &str = "O";

/// Tag I-O-B de início de trecho.
pub const IOB_BEGIN: &str = "B";
/// Tag I-O-B de continuação de trecho.
pub const IOB_INSIDE: &str = "I";
/// Tag I-O-B fora de trecho (coincide com o rótulo sentinela de domínio).
pub const IOB_OUTSIDE: &str = "O";

/// Rótulo de entidade como par `(tipo, subtipo)`.
///
/// A igualdade é estrutural e a forma textual é `"tipo.subtipo"`, exceto
/// para a sentinela `O`, cuja forma textual é apenas `"O"`. O valor é
/// imutável depois de construído.
///
/// # Exemplo
/// ```
/// use cyner_core::tagger::EntityType;
///
/// let product = EntityType::sw_product();
/// assert_eq!(product.to_string(), "sw.product");
/// assert_eq!(EntityType::from_label("sw.product"), product);
/// assert!(EntityType::from_label("O").is_outside());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityType {
    #[serde(rename = "type")]
    cyber_type: String,
    #[serde(rename = "subtype")]
    cyber_subtype: String,
}

impl EntityType {
    pub fn new(cyber_type: impl Into<String>, cyber_subtype: impl Into<String>) -> Self {
        Self {
            cyber_type: cyber_type.into(),
            cyber_subtype: cyber_subtype.into(),
        }
    }

    /// A sentinela `O` (tipo e subtipo são ambos `"O"`).
    pub fn outside() -> Self {
        Self::new(OUTSIDE, OUTSIDE)
    }

    pub fn sw_vendor() -> Self {
        Self::new("sw", "vendor")
    }

    pub fn sw_product() -> Self {
        Self::new("sw", "product")
    }

    pub fn sw_version() -> Self {
        Self::new("sw", "version")
    }

    pub fn file_name() -> Self {
        Self::new("file", "name")
    }

    pub fn function_name() -> Self {
        Self::new("function", "name")
    }

    pub fn vuln_ms() -> Self {
        Self::new("vuln", "ms")
    }

    pub fn vuln_name() -> Self {
        Self::new("vuln", "name")
    }

    pub fn vuln_description() -> Self {
        Self::new("vuln", "description")
    }

    pub fn vuln_cve() -> Self {
        Self::new("vuln", "cve")
    }

    pub fn cyber_type(&self) -> &str {
        &self.cyber_type
    }

    pub fn cyber_subtype(&self) -> &str {
        &self.cyber_subtype
    }

    pub fn is_outside(&self) -> bool {
        self.cyber_type.eq_ignore_ascii_case(OUTSIDE)
    }

    /// Interpreta a forma textual de um rótulo (saída do modelo de domínio).
    ///
    /// Qualquer string sem `.` é tratada como a sentinela `O` — o modelo só
    /// produz rótulos compostos ou `"O"`.
    pub fn from_label(label: &str) -> Self {
        match label.split_once('.') {
            Some((cyber_type, cyber_subtype)) => Self::new(cyber_type, cyber_subtype),
            None => Self::outside(),
        }
    }
}

impl Default for EntityType {
    fn default() -> Self {
        Self::outside()
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_outside() {
            write!(f, "{OUTSIDE}")
        } else {
            write!(f, "{}.{}", self.cyber_type, self.cyber_subtype)
        }
    }
}

/// Proveniência do rótulo heurístico de um token.
///
/// Registra qual estágio produziu o palpite preliminar, o que permite
/// auditar a cobertura de cada heurística separadamente.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicMethod {
    /// Nenhuma heurística rotulou o token (rótulo permanece `O`).
    None,
    /// Lista de entidades conhecidas (gazetteer).
    Dictionary,
    /// Regra contextual com expressões regulares.
    Regex,
    /// Mapa token→rótulo construído durante o treinamento.
    TrainingMap,
}

impl HeuristicMethod {
    pub fn name(&self) -> &'static str {
        match self {
            HeuristicMethod::None => "none",
            HeuristicMethod::Dictionary => "dictionary",
            HeuristicMethod::Regex => "regex",
            HeuristicMethod::TrainingMap => "training_map",
        }
    }
}

impl Default for HeuristicMethod {
    fn default() -> Self {
        HeuristicMethod::None
    }
}
