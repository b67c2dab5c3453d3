//! Reserved words of PPL and the grammar tables derived from them
//!
//! Keywords are matched case-insensitively by the lexer. Most of them may also
//! appear where the grammar expects a plain identifier (field names such as
//! `count`, `host`, `date`), which is what [`GrammarTables::can_be_ident`]
//! decides.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::LazyLock;

macro_rules! keywords {
    ($($variant:ident => $text:literal,)*) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize))]
        pub enum Keyword {
            $($variant,)*
        }

        impl Keyword {
            pub const ALL: &'static [Keyword] = &[$(Keyword::$variant,)*];

            /// Canonical upper-case spelling
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Keyword::$variant => $text,)*
                }
            }
        }
    };
}

keywords! {
    // Commands
    Search => "SEARCH",
    Describe => "DESCRIBE",
    Show => "SHOW",
    From => "FROM",
    Where => "WHERE",
    Fields => "FIELDS",
    Rename => "RENAME",
    Stats => "STATS",
    Dedup => "DEDUP",
    Sort => "SORT",
    Eval => "EVAL",
    Head => "HEAD",
    Top => "TOP",
    Rare => "RARE",
    Parse => "PARSE",
    Method => "METHOD",
    Regex => "REGEX",
    Punct => "PUNCT",
    Grok => "GROK",
    Pattern => "PATTERN",
    Patterns => "PATTERNS",
    NewField => "NEW_FIELD",
    Kmeans => "KMEANS",
    Ad => "AD",
    Ml => "ML",

    // Command assist
    As => "AS",
    By => "BY",
    Source => "SOURCE",
    Index => "INDEX",
    D => "D",
    Desc => "DESC",
    Datasources => "DATASOURCES",
    Sortby => "SORTBY",
    Auto => "AUTO",
    Str => "STR",
    Ip => "IP",
    Num => "NUM",
    Keepempty => "KEEPEMPTY",
    Consecutive => "CONSECUTIVE",
    DedupSplitvalues => "DEDUP_SPLITVALUES",
    Partitions => "PARTITIONS",
    Allnum => "ALLNUM",
    Delim => "DELIM",
    Centroids => "CENTROIDS",
    Iterations => "ITERATIONS",
    DistanceType => "DISTANCE_TYPE",
    NumberOfTrees => "NUMBER_OF_TREES",
    ShingleSize => "SHINGLE_SIZE",
    SampleSize => "SAMPLE_SIZE",
    OutputAfter => "OUTPUT_AFTER",
    TimeDecay => "TIME_DECAY",
    AnomalyRate => "ANOMALY_RATE",
    CategoryField => "CATEGORY_FIELD",
    TimeField => "TIME_FIELD",
    TimeZone => "TIME_ZONE",
    TrainingDataSize => "TRAINING_DATA_SIZE",
    AnomalyScoreThreshold => "ANOMALY_SCORE_THRESHOLD",

    // Logical and comparison
    In => "IN",
    Not => "NOT",
    Or => "OR",
    And => "AND",
    Xor => "XOR",
    True => "TRUE",
    False => "FALSE",
    Regexp => "REGEXP",

    // Interval units
    Interval => "INTERVAL",
    Microsecond => "MICROSECOND",
    Millisecond => "MILLISECOND",
    Second => "SECOND",
    Minute => "MINUTE",
    Hour => "HOUR",
    Day => "DAY",
    Week => "WEEK",
    Month => "MONTH",
    Quarter => "QUARTER",
    Year => "YEAR",
    SecondMicrosecond => "SECOND_MICROSECOND",
    MinuteMicrosecond => "MINUTE_MICROSECOND",
    MinuteSecond => "MINUTE_SECOND",
    HourMicrosecond => "HOUR_MICROSECOND",
    HourSecond => "HOUR_SECOND",
    HourMinute => "HOUR_MINUTE",
    DayMicrosecond => "DAY_MICROSECOND",
    DaySecond => "DAY_SECOND",
    DayMinute => "DAY_MINUTE",
    DayHour => "DAY_HOUR",
    YearMonth => "YEAR_MONTH",

    // Timespan units
    Span => "SPAN",
    Ms => "MS",
    S => "S",
    M => "M",
    H => "H",
    W => "W",
    Q => "Q",
    Y => "Y",

    // Converted data types
    Int => "INT",
    Integer => "INTEGER",
    Double => "DOUBLE",
    Long => "LONG",
    Float => "FLOAT",
    String => "STRING",
    Boolean => "BOOLEAN",

    // Aggregations
    Avg => "AVG",
    Count => "COUNT",
    DistinctCount => "DISTINCT_COUNT",
    Estdc => "ESTDC",
    EstdcError => "ESTDC_ERROR",
    Max => "MAX",
    Mean => "MEAN",
    Median => "MEDIAN",
    Min => "MIN",
    Mode => "MODE",
    Range => "RANGE",
    Stdev => "STDEV",
    Stdevp => "STDEVP",
    Sum => "SUM",
    Sumsq => "SUMSQ",
    VarSamp => "VAR_SAMP",
    VarPop => "VAR_POP",
    StddevSamp => "STDDEV_SAMP",
    StddevPop => "STDDEV_POP",
    Percentile => "PERCENTILE",
    Take => "TAKE",
    First => "FIRST",
    Last => "LAST",
    List => "LIST",
    Values => "VALUES",
    Earliest => "EARLIEST",
    EarliestTime => "EARLIEST_TIME",
    Latest => "LATEST",
    LatestTime => "LATEST_TIME",
    PerDay => "PER_DAY",
    PerHour => "PER_HOUR",
    PerMinute => "PER_MINUTE",
    PerSecond => "PER_SECOND",
    Rate => "RATE",
    Sparkline => "SPARKLINE",
    C => "C",
    Dc => "DC",

    // Mathematical functions
    Abs => "ABS",
    Cbrt => "CBRT",
    Ceil => "CEIL",
    Ceiling => "CEILING",
    Conv => "CONV",
    Crc32 => "CRC32",
    E => "E",
    Exp => "EXP",
    Floor => "FLOOR",
    Ln => "LN",
    Log => "LOG",
    Log10 => "LOG10",
    Log2 => "LOG2",
    Mod => "MOD",
    Pi => "PI",
    Position => "POSITION",
    Pow => "POW",
    Power => "POWER",
    Rand => "RAND",
    Round => "ROUND",
    Sign => "SIGN",
    Sqrt => "SQRT",
    Truncate => "TRUNCATE",

    // Trigonometric functions
    Acos => "ACOS",
    Asin => "ASIN",
    Atan => "ATAN",
    Atan2 => "ATAN2",
    Cos => "COS",
    Cot => "COT",
    Degrees => "DEGREES",
    Radians => "RADIANS",
    Sin => "SIN",
    Tan => "TAN",

    // Date and time functions
    Adddate => "ADDDATE",
    Addtime => "ADDTIME",
    ConvertTz => "CONVERT_TZ",
    Curdate => "CURDATE",
    CurrentDate => "CURRENT_DATE",
    CurrentTime => "CURRENT_TIME",
    CurrentTimestamp => "CURRENT_TIMESTAMP",
    Curtime => "CURTIME",
    Date => "DATE",
    Datediff => "DATEDIFF",
    Datetime => "DATETIME",
    DateAdd => "DATE_ADD",
    DateFormat => "DATE_FORMAT",
    DateSub => "DATE_SUB",
    Dayname => "DAYNAME",
    Dayofmonth => "DAYOFMONTH",
    Dayofweek => "DAYOFWEEK",
    Dayofyear => "DAYOFYEAR",
    DayOfMonth => "DAY_OF_MONTH",
    DayOfWeek => "DAY_OF_WEEK",
    DayOfYear => "DAY_OF_YEAR",
    Extract => "EXTRACT",
    FromDays => "FROM_DAYS",
    FromUnixtime => "FROM_UNIXTIME",
    GetFormat => "GET_FORMAT",
    HourOfDay => "HOUR_OF_DAY",
    LastDay => "LAST_DAY",
    Localtime => "LOCALTIME",
    Localtimestamp => "LOCALTIMESTAMP",
    Makedate => "MAKEDATE",
    Maketime => "MAKETIME",
    MinuteOfDay => "MINUTE_OF_DAY",
    MinuteOfHour => "MINUTE_OF_HOUR",
    Monthname => "MONTHNAME",
    MonthOfYear => "MONTH_OF_YEAR",
    Now => "NOW",
    PeriodAdd => "PERIOD_ADD",
    PeriodDiff => "PERIOD_DIFF",
    SecondOfMinute => "SECOND_OF_MINUTE",
    SecToTime => "SEC_TO_TIME",
    StrToDate => "STR_TO_DATE",
    Subdate => "SUBDATE",
    Subtime => "SUBTIME",
    Sysdate => "SYSDATE",
    Time => "TIME",
    Timediff => "TIMEDIFF",
    Timestamp => "TIMESTAMP",
    Timestampadd => "TIMESTAMPADD",
    Timestampdiff => "TIMESTAMPDIFF",
    TimeFormat => "TIME_FORMAT",
    TimeToSec => "TIME_TO_SEC",
    ToDays => "TO_DAYS",
    ToSeconds => "TO_SECONDS",
    UnixTimestamp => "UNIX_TIMESTAMP",
    UtcDate => "UTC_DATE",
    UtcTime => "UTC_TIME",
    UtcTimestamp => "UTC_TIMESTAMP",
    Weekday => "WEEKDAY",
    WeekOfYear => "WEEK_OF_YEAR",
    Yearweek => "YEARWEEK",

    // Text functions
    Substr => "SUBSTR",
    Substring => "SUBSTRING",
    Ltrim => "LTRIM",
    Rtrim => "RTRIM",
    Trim => "TRIM",
    Lower => "LOWER",
    Upper => "UPPER",
    Concat => "CONCAT",
    ConcatWs => "CONCAT_WS",
    Length => "LENGTH",
    Strcmp => "STRCMP",
    Right => "RIGHT",
    Left => "LEFT",
    Ascii => "ASCII",
    Locate => "LOCATE",
    Replace => "REPLACE",
    Reverse => "REVERSE",
    Cast => "CAST",

    // Condition and system functions
    Like => "LIKE",
    Isnull => "ISNULL",
    Isnotnull => "ISNOTNULL",
    Ifnull => "IFNULL",
    Nullif => "NULLIF",
    If => "IF",
    Typeof => "TYPEOF",

    // Relevance functions
    Match => "MATCH",
    MatchPhrase => "MATCH_PHRASE",
    MatchPhrasePrefix => "MATCH_PHRASE_PREFIX",
    MatchBoolPrefix => "MATCH_BOOL_PREFIX",
    SimpleQueryString => "SIMPLE_QUERY_STRING",
    MultiMatch => "MULTI_MATCH",
    QueryString => "QUERY_STRING",

    // Relevance arguments
    AllowLeadingWildcard => "ALLOW_LEADING_WILDCARD",
    AnalyzeWildcard => "ANALYZE_WILDCARD",
    Analyzer => "ANALYZER",
    AutoGenerateSynonymsPhraseQuery => "AUTO_GENERATE_SYNONYMS_PHRASE_QUERY",
    Boost => "BOOST",
    CutoffFrequency => "CUTOFF_FREQUENCY",
    DefaultField => "DEFAULT_FIELD",
    DefaultOperator => "DEFAULT_OPERATOR",
    EnablePositionIncrements => "ENABLE_POSITION_INCREMENTS",
    Escape => "ESCAPE",
    Flags => "FLAGS",
    FuzzyMaxExpansions => "FUZZY_MAX_EXPANSIONS",
    FuzzyPrefixLength => "FUZZY_PREFIX_LENGTH",
    FuzzyTranspositions => "FUZZY_TRANSPOSITIONS",
    FuzzyRewrite => "FUZZY_REWRITE",
    Fuzziness => "FUZZINESS",
    Lenient => "LENIENT",
    LowFreqOperator => "LOW_FREQ_OPERATOR",
    MaxDeterminizedStates => "MAX_DETERMINIZED_STATES",
    MaxExpansions => "MAX_EXPANSIONS",
    MinimumShouldMatch => "MINIMUM_SHOULD_MATCH",
    Operator => "OPERATOR",
    PhraseSlop => "PHRASE_SLOP",
    PrefixLength => "PREFIX_LENGTH",
    QuoteAnalyzer => "QUOTE_ANALYZER",
    QuoteFieldSuffix => "QUOTE_FIELD_SUFFIX",
    Rewrite => "REWRITE",
    Slop => "SLOP",
    TieBreaker => "TIE_BREAKER",
    Type => "TYPE",
    ZeroTermsQuery => "ZERO_TERMS_QUERY",
}

impl Keyword {
    /// Look up a word case-insensitively
    pub fn lookup(word: &str) -> Option<Keyword> {
        grammar().lookup(word)
    }

    /// Lower-case spelling, used as the canonical name of functions and arguments
    pub fn canonical_name(self) -> String {
        self.as_str().to_ascii_lowercase()
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

use Keyword as K;

/// Commands allowed after a pipe, in dispatch order
pub const PIPE_COMMANDS: &[Keyword] = &[
    K::Where,
    K::Fields,
    K::Rename,
    K::Stats,
    K::Dedup,
    K::Sort,
    K::Eval,
    K::Head,
    K::Top,
    K::Rare,
    K::Grok,
    K::Parse,
    K::Patterns,
    K::Kmeans,
    K::Ad,
    K::Ml,
];

const AGGREGATIONS: &[Keyword] = &[
    K::Avg,
    K::Count,
    K::DistinctCount,
    K::Estdc,
    K::EstdcError,
    K::Max,
    K::Mean,
    K::Median,
    K::Min,
    K::Mode,
    K::Range,
    K::Stdev,
    K::Stdevp,
    K::Sum,
    K::Sumsq,
    K::VarSamp,
    K::VarPop,
    K::StddevSamp,
    K::StddevPop,
    K::Percentile,
    K::Take,
    K::First,
    K::Last,
    K::List,
    K::Values,
    K::Earliest,
    K::EarliestTime,
    K::Latest,
    K::LatestTime,
    K::PerDay,
    K::PerHour,
    K::PerMinute,
    K::PerSecond,
    K::Rate,
    K::Sparkline,
    K::C,
    K::Dc,
];

pub const MATH_FUNCTIONS: &[Keyword] = &[
    K::Abs,
    K::Cbrt,
    K::Ceil,
    K::Ceiling,
    K::Conv,
    K::Crc32,
    K::E,
    K::Exp,
    K::Floor,
    K::Ln,
    K::Log,
    K::Log10,
    K::Log2,
    K::Mod,
    K::Pi,
    K::Pow,
    K::Power,
    K::Rand,
    K::Round,
    K::Sign,
    K::Sqrt,
    K::Truncate,
];

pub const TRIGONOMETRIC_FUNCTIONS: &[Keyword] = &[
    K::Acos,
    K::Asin,
    K::Atan,
    K::Atan2,
    K::Cos,
    K::Cot,
    K::Degrees,
    K::Radians,
    K::Sin,
    K::Tan,
];

pub const DATETIME_FUNCTIONS: &[Keyword] = &[
    K::Adddate,
    K::Addtime,
    K::ConvertTz,
    K::Curdate,
    K::CurrentDate,
    K::CurrentTime,
    K::CurrentTimestamp,
    K::Curtime,
    K::Date,
    K::Datediff,
    K::Datetime,
    K::DateAdd,
    K::DateFormat,
    K::DateSub,
    K::Day,
    K::Dayname,
    K::Dayofmonth,
    K::Dayofweek,
    K::Dayofyear,
    K::DayOfMonth,
    K::DayOfWeek,
    K::DayOfYear,
    K::FromDays,
    K::FromUnixtime,
    K::Hour,
    K::HourOfDay,
    K::LastDay,
    K::Localtime,
    K::Localtimestamp,
    K::Makedate,
    K::Maketime,
    K::Microsecond,
    K::Minute,
    K::MinuteOfDay,
    K::MinuteOfHour,
    K::Month,
    K::Monthname,
    K::MonthOfYear,
    K::Now,
    K::PeriodAdd,
    K::PeriodDiff,
    K::Quarter,
    K::Second,
    K::SecondOfMinute,
    K::SecToTime,
    K::StrToDate,
    K::Subdate,
    K::Subtime,
    K::Sysdate,
    K::Time,
    K::Timediff,
    K::Timestamp,
    K::TimeFormat,
    K::TimeToSec,
    K::ToDays,
    K::ToSeconds,
    K::UnixTimestamp,
    K::UtcDate,
    K::UtcTime,
    K::UtcTimestamp,
    K::Week,
    K::Weekday,
    K::WeekOfYear,
    K::Year,
    K::Yearweek,
];

pub const TEXT_FUNCTIONS: &[Keyword] = &[
    K::Substr,
    K::Substring,
    K::Trim,
    K::Ltrim,
    K::Rtrim,
    K::Lower,
    K::Upper,
    K::Concat,
    K::ConcatWs,
    K::Length,
    K::Strcmp,
    K::Right,
    K::Left,
    K::Ascii,
    K::Locate,
    K::Replace,
    K::Reverse,
];

pub const CONDITION_FUNCTIONS: &[Keyword] =
    &[K::Like, K::If, K::Isnull, K::Isnotnull, K::Ifnull, K::Nullif];

pub const SYSTEM_FUNCTIONS: &[Keyword] = &[K::Typeof];

pub const POSITION_FUNCTIONS: &[Keyword] = &[K::Position];

pub const RELEVANCE_ARGS: &[Keyword] = &[
    K::AllowLeadingWildcard,
    K::AnalyzeWildcard,
    K::Analyzer,
    K::AutoGenerateSynonymsPhraseQuery,
    K::Boost,
    K::CutoffFrequency,
    K::DefaultField,
    K::DefaultOperator,
    K::EnablePositionIncrements,
    K::Escape,
    K::Flags,
    K::FuzzyMaxExpansions,
    K::FuzzyPrefixLength,
    K::FuzzyTranspositions,
    K::FuzzyRewrite,
    K::Fuzziness,
    K::Lenient,
    K::LowFreqOperator,
    K::MaxDeterminizedStates,
    K::MaxExpansions,
    K::MinimumShouldMatch,
    K::Operator,
    K::PhraseSlop,
    K::PrefixLength,
    K::QuoteAnalyzer,
    K::QuoteFieldSuffix,
    K::Rewrite,
    K::Slop,
    K::TieBreaker,
    K::TimeZone,
    K::Type,
    K::ZeroTermsQuery,
];

pub const SIMPLE_DATETIME_PARTS: &[Keyword] = &[
    K::Microsecond,
    K::Second,
    K::Minute,
    K::Hour,
    K::Day,
    K::Week,
    K::Month,
    K::Quarter,
    K::Year,
];

pub const COMPLEX_DATETIME_PARTS: &[Keyword] = &[
    K::SecondMicrosecond,
    K::MinuteMicrosecond,
    K::MinuteSecond,
    K::HourMicrosecond,
    K::HourSecond,
    K::HourMinute,
    K::DayMicrosecond,
    K::DaySecond,
    K::DayMinute,
    K::DayHour,
    K::YearMonth,
];

pub const TIMESPAN_UNITS: &[Keyword] = &[
    K::Ms,
    K::S,
    K::M,
    K::H,
    K::D,
    K::W,
    K::Q,
    K::Y,
    K::Millisecond,
    K::Second,
    K::Minute,
    K::Hour,
    K::Day,
    K::Week,
    K::Month,
    K::Quarter,
    K::Year,
];

pub const DATA_TYPES: &[Keyword] = &[
    K::Date,
    K::Time,
    K::Timestamp,
    K::Int,
    K::Integer,
    K::Double,
    K::Long,
    K::Float,
    K::String,
    K::Boolean,
];

/// Command, parameter and algorithm words that stay usable as identifiers
const COMMAND_WORDS: &[Keyword] = &[
    K::Search,
    K::Describe,
    K::Show,
    K::From,
    K::Where,
    K::Fields,
    K::Rename,
    K::Stats,
    K::Dedup,
    K::Sort,
    K::Eval,
    K::Head,
    K::Top,
    K::Rare,
    K::Parse,
    K::Method,
    K::Regex,
    K::Punct,
    K::Grok,
    K::Pattern,
    K::Patterns,
    K::NewField,
    K::Kmeans,
    K::Ad,
    K::Ml,
    K::Source,
    K::Index,
    K::D,
    K::Desc,
    K::Datasources,
    K::Sortby,
    K::Str,
    K::Ip,
    K::Num,
    K::Keepempty,
    K::Consecutive,
    K::DedupSplitvalues,
    K::Partitions,
    K::Allnum,
    K::Delim,
    K::Centroids,
    K::Iterations,
    K::DistanceType,
    K::NumberOfTrees,
    K::ShingleSize,
    K::SampleSize,
    K::OutputAfter,
    K::TimeDecay,
    K::AnomalyRate,
    K::CategoryField,
    K::TimeField,
    K::TimeZone,
    K::TrainingDataSize,
    K::AnomalyScoreThreshold,
    K::Span,
];

/// Function family a call name belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FunctionFamily {
    Mathematical,
    Trigonometric,
    DateTime,
    Text,
    Condition,
    System,
    Position,
}

/// Immutable lookup tables shared by every parse
pub struct GrammarTables {
    by_name: HashMap<&'static str, Keyword>,
    ident_keywords: HashSet<Keyword>,
    functions: HashMap<Keyword, FunctionFamily>,
}

impl GrammarTables {
    fn build() -> Self {
        let by_name = Keyword::ALL.iter().map(|k| (k.as_str(), *k)).collect();

        let mut functions = HashMap::new();
        let families = [
            (MATH_FUNCTIONS, FunctionFamily::Mathematical),
            (TRIGONOMETRIC_FUNCTIONS, FunctionFamily::Trigonometric),
            (DATETIME_FUNCTIONS, FunctionFamily::DateTime),
            (TEXT_FUNCTIONS, FunctionFamily::Text),
            (CONDITION_FUNCTIONS, FunctionFamily::Condition),
            (SYSTEM_FUNCTIONS, FunctionFamily::System),
            (POSITION_FUNCTIONS, FunctionFamily::Position),
        ];
        for (names, family) in families {
            for name in names {
                functions.entry(*name).or_insert(family);
            }
        }

        let ident_keywords = functions
            .keys()
            .copied()
            .chain(TIMESPAN_UNITS.iter().copied())
            .chain(SIMPLE_DATETIME_PARTS.iter().copied())
            .chain(COMPLEX_DATETIME_PARTS.iter().copied())
            .chain(RELEVANCE_ARGS.iter().copied())
            .chain(COMMAND_WORDS.iter().copied())
            .chain(AGGREGATIONS.iter().copied())
            .collect();

        Self {
            by_name,
            ident_keywords,
            functions,
        }
    }

    pub fn lookup(&self, word: &str) -> Option<Keyword> {
        if word.bytes().any(|b| b.is_ascii_lowercase()) {
            self.by_name.get(word.to_ascii_uppercase().as_str()).copied()
        } else {
            self.by_name.get(word).copied()
        }
    }

    /// Whether a reserved word may stand in for a plain identifier
    pub fn can_be_ident(&self, keyword: Keyword) -> bool {
        self.ident_keywords.contains(&keyword)
    }

    /// Family of an eval function name, `None` if the word is not callable
    pub fn function_family(&self, keyword: Keyword) -> Option<FunctionFamily> {
        self.functions.get(&keyword).copied()
    }

    pub fn ident_keyword_count(&self) -> usize {
        self.ident_keywords.len()
    }
}

static GRAMMAR: LazyLock<GrammarTables> = LazyLock::new(|| {
    let tables = GrammarTables::build();
    log::debug!(
        "built grammar tables: {} keywords, {} usable as identifiers",
        tables.by_name.len(),
        tables.ident_keywords.len()
    );
    tables
});

/// Process-wide grammar tables, built on first use
pub fn grammar() -> &'static GrammarTables {
    &GRAMMAR
}
