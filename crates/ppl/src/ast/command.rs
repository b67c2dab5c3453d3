//! The query pipeline and its commands

use indexmap::IndexMap;

use super::{
    DecimalLiteral, Expression, FunctionArg, IntegerLiteral, Literal, LogicalExpr,
    QualifiedName, TimespanUnit, ValueExpr, WildcardQualifiedName, keyword_enum,
};

/// A parsed query: one generating command followed by pipeline stages
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Query {
    pub commands: Vec<Command>,
}

impl Query {
    pub fn source(&self) -> Option<&Command> {
        self.commands.first()
    }

    pub fn stages(&self) -> &[Command] {
        self.commands.get(1..).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Command {
    Search(SearchCommand),
    Describe(DescribeCommand),
    ShowDataSources,
    Where(WhereCommand),
    Fields(FieldsCommand),
    Rename(RenameCommand),
    Stats(StatsCommand),
    Dedup(DedupCommand),
    Sort(SortCommand),
    Eval(EvalCommand),
    Head(HeadCommand),
    Top(TopCommand),
    Rare(RareCommand),
    Grok(GrokCommand),
    Parse(ParseCommand),
    Patterns(PatternsCommand),
    Kmeans(KmeansCommand),
    Ad(AdCommand),
    Ml(MlCommand),
}

impl Command {
    /// Lower-case command word
    pub fn name(&self) -> &'static str {
        match self {
            Command::Search(_) => "search",
            Command::Describe(_) => "describe",
            Command::ShowDataSources => "show datasources",
            Command::Where(_) => "where",
            Command::Fields(_) => "fields",
            Command::Rename(_) => "rename",
            Command::Stats(_) => "stats",
            Command::Dedup(_) => "dedup",
            Command::Sort(_) => "sort",
            Command::Eval(_) => "eval",
            Command::Head(_) => "head",
            Command::Top(_) => "top",
            Command::Rare(_) => "rare",
            Command::Grok(_) => "grok",
            Command::Parse(_) => "parse",
            Command::Patterns(_) => "patterns",
            Command::Kmeans(_) => "kmeans",
            Command::Ad(_) => "ad",
            Command::Ml(_) => "ml",
        }
    }

    /// Whether the command can only start a query
    pub fn is_generating(&self) -> bool {
        matches!(
            self,
            Command::Search(_) | Command::Describe(_) | Command::ShowDataSources
        )
    }
}

// ============ Generating commands ============

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SearchCommand {
    /// `search source=logs`
    From(FromClause),
    /// `search source=logs status=200`
    FromFilter {
        from: FromClause,
        filter: LogicalExpr,
    },
    /// `search status=200 source=logs`
    FilterFrom {
        filter: LogicalExpr,
        from: FromClause,
    },
}

impl SearchCommand {
    pub fn from_clause(&self) -> &FromClause {
        match self {
            SearchCommand::From(from)
            | SearchCommand::FromFilter { from, .. }
            | SearchCommand::FilterFrom { from, .. } => from,
        }
    }

    pub fn filter(&self) -> Option<&LogicalExpr> {
        match self {
            SearchCommand::From(_) => None,
            SearchCommand::FromFilter { filter, .. } | SearchCommand::FilterFrom { filter, .. } => {
                Some(filter)
            }
        }
    }
}

keyword_enum! {
    FromKeyword {
        Source => Source,
        Index => Index,
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FromClause {
    pub keyword: FromKeyword,
    pub target: FromTarget,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FromTarget {
    Tables(Vec<TableSource>),
    /// Table-valued function, e.g. `source=prometheus.query_range(...)`
    Function {
        name: QualifiedName,
        args: Vec<FunctionArg>,
    },
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TableSource {
    Name {
        /// Remote cluster prefix, `remote:` without the colon
        cluster: Option<String>,
        name: QualifiedName,
    },
    /// `logs-2021.01.11`
    DateSuffixed(String),
}

impl TableSource {
    pub fn named(name: impl Into<String>) -> Self {
        TableSource::Name {
            cluster: None,
            name: QualifiedName::single(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DescribeCommand {
    pub tables: Vec<TableSource>,
}

// ============ Filtering and projection ============

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WhereCommand {
    pub condition: LogicalExpr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FieldsMode {
    Include,
    Exclude,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FieldsCommand {
    /// `+` or `-` prefix; absent means include
    pub mode: Option<FieldsMode>,
    pub fields: Vec<QualifiedName>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RenameClause {
    pub original: WildcardQualifiedName,
    pub renamed: WildcardQualifiedName,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RenameCommand {
    pub clauses: Vec<RenameClause>,
}

// ============ Stats ============

keyword_enum! {
    /// Aggregations called as `name(expr)`
    AggregateFunction {
        Avg => Avg,
        Count => Count,
        Sum => Sum,
        Min => Min,
        Max => Max,
        VarSamp => VarSamp,
        VarPop => VarPop,
        StddevSamp => StddevSamp,
        StddevPop => StddevPop,
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum StatsFunction {
    Call {
        function: AggregateFunction,
        arg: ValueExpr,
    },
    /// `count()`
    CountAll,
    /// `distinct_count(expr)` or its `dc(expr)` spelling
    DistinctCount(ValueExpr),
    /// `percentile<95>(latency)`
    Percentile {
        percent: IntegerLiteral,
        field: QualifiedName,
    },
    /// `take(message, 5)`
    Take {
        field: QualifiedName,
        size: Option<IntegerLiteral>,
    },
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AggregationTerm {
    pub function: StatsFunction,
    pub alias: Option<WildcardQualifiedName>,
}

/// `span(field, interval [unit])`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SpanClause {
    pub field: QualifiedName,
    pub value: Literal,
    pub unit: Option<TimespanUnit>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BySpan {
    pub span: SpanClause,
    pub alias: Option<QualifiedName>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum StatsByClause {
    Fields(Vec<QualifiedName>),
    Span(BySpan),
    SpanAndFields(BySpan, Vec<QualifiedName>),
}

impl StatsByClause {
    pub fn fields(&self) -> &[QualifiedName] {
        match self {
            StatsByClause::Fields(fields) | StatsByClause::SpanAndFields(_, fields) => fields,
            StatsByClause::Span(_) => &[],
        }
    }

    pub fn span(&self) -> Option<&BySpan> {
        match self {
            StatsByClause::Span(span) | StatsByClause::SpanAndFields(span, _) => Some(span),
            StatsByClause::Fields(_) => None,
        }
    }
}

/// Parameters appear in the fixed order of the fields below
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StatsCommand {
    pub partitions: Option<IntegerLiteral>,
    pub all_num: Option<bool>,
    pub delim: Option<String>,
    pub aggregations: Vec<AggregationTerm>,
    pub by: Option<StatsByClause>,
    pub dedup_split_values: Option<bool>,
}

// ============ Row shaping ============

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DedupCommand {
    pub count: Option<IntegerLiteral>,
    pub fields: Vec<QualifiedName>,
    pub keep_empty: Option<bool>,
    pub consecutive: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

keyword_enum! {
    /// Type coercion applied to a sort key
    SortCast {
        Auto => Auto,
        Str => Str,
        Ip => Ip,
        Num => Num,
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SortField {
    pub order: SortOrder,
    pub cast: Option<SortCast>,
    pub field: QualifiedName,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SortCommand {
    pub fields: Vec<SortField>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EvalClause {
    pub field: QualifiedName,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EvalCommand {
    pub clauses: Vec<EvalClause>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HeadCommand {
    pub size: Option<IntegerLiteral>,
    pub offset: Option<IntegerLiteral>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TopCommand {
    pub count: Option<IntegerLiteral>,
    pub fields: Vec<QualifiedName>,
    pub by: Vec<QualifiedName>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RareCommand {
    pub fields: Vec<QualifiedName>,
    pub by: Vec<QualifiedName>,
}

// ============ Text extraction ============

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GrokCommand {
    pub source: Expression,
    pub pattern: String,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParseCommand {
    pub source: Expression,
    pub pattern: String,
}

keyword_enum! {
    PatternsMethod {
        Punct => Punct,
        Regex => Regex,
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PatternsCommand {
    pub new_field: Option<String>,
    pub pattern: Option<String>,
    pub method: Option<PatternsMethod>,
    pub source: Expression,
}

// ============ Machine learning ============

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct KmeansCommand {
    pub centroids: Option<IntegerLiteral>,
    pub iterations: Option<IntegerLiteral>,
    pub distance_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AdCommand {
    pub number_of_trees: Option<IntegerLiteral>,
    pub shingle_size: Option<IntegerLiteral>,
    pub sample_size: Option<IntegerLiteral>,
    pub output_after: Option<IntegerLiteral>,
    pub time_decay: Option<DecimalLiteral>,
    pub anomaly_rate: Option<DecimalLiteral>,
    pub category_field: Option<String>,
    pub time_field: Option<String>,
    pub date_format: Option<String>,
    pub time_zone: Option<String>,
    pub training_data_size: Option<IntegerLiteral>,
    pub anomaly_score_threshold: Option<DecimalLiteral>,
}

/// `ml name=value ...`, arguments kept in written order
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MlCommand {
    pub args: IndexMap<String, Literal>,
}

impl MlCommand {
    pub fn arg(&self, name: &str) -> Option<&Literal> {
        self.args.get(name)
    }
}
