//! Literals, expressions and function calls

use super::{QualifiedName, keyword_enum};
use crate::keyword::FunctionFamily;

// ============ Literals ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Sign {
    Plus,
    Minus,
}

/// Integer literal; a leading sign belongs to the literal, not to an operator
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IntegerLiteral {
    pub sign: Option<Sign>,
    pub digits: String,
}

impl IntegerLiteral {
    pub fn new(value: i64) -> Self {
        let sign = (value < 0).then_some(Sign::Minus);
        Self {
            sign,
            digits: value.unsigned_abs().to_string(),
        }
    }

    /// Numeric value, `None` when it does not fit in an `i64`
    pub fn value(&self) -> Option<i64> {
        let text = match self.sign {
            Some(Sign::Minus) => format!("-{}", self.digits),
            _ => self.digits.clone(),
        };
        text.parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DecimalLiteral {
    pub sign: Option<Sign>,
    /// Text as written, e.g. `3.14` or `.5`
    pub digits: String,
}

impl DecimalLiteral {
    pub fn value(&self) -> Option<f64> {
        let magnitude: f64 = self.digits.parse().ok()?;
        Some(match self.sign {
            Some(Sign::Minus) => -magnitude,
            _ => magnitude,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Literal {
    Integer(IntegerLiteral),
    Decimal(DecimalLiteral),
    String(String),
    Boolean(bool),
    Interval {
        value: Box<ValueExpr>,
        unit: DateTimeUnit,
    },
    Date(String),
    Time(String),
    Timestamp(String),
}

impl Literal {
    pub fn int(value: i64) -> Self {
        Literal::Integer(IntegerLiteral::new(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Literal::String(value.into())
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Literal::Integer(_) | Literal::Decimal(_))
    }
}

keyword_enum! {
    /// Interval, extract and timestamp-function units
    DateTimeUnit {
        Microsecond => Microsecond,
        Second => Second,
        Minute => Minute,
        Hour => Hour,
        Day => Day,
        Week => Week,
        Month => Month,
        Quarter => Quarter,
        Year => Year,
        SecondMicrosecond => SecondMicrosecond,
        MinuteMicrosecond => MinuteMicrosecond,
        MinuteSecond => MinuteSecond,
        HourMicrosecond => HourMicrosecond,
        HourSecond => HourSecond,
        HourMinute => HourMinute,
        DayMicrosecond => DayMicrosecond,
        DaySecond => DaySecond,
        DayMinute => DayMinute,
        DayHour => DayHour,
        YearMonth => YearMonth,
    }
}

impl DateTimeUnit {
    /// `DAY_HOUR` style units spanning two parts
    pub fn is_compound(self) -> bool {
        self.keyword().as_str().contains('_')
    }
}

keyword_enum! {
    /// Bucket unit of a `span(...)` clause
    TimespanUnit {
        Ms => Ms,
        S => S,
        M => M,
        H => H,
        D => D,
        W => W,
        Q => Q,
        Y => Y,
        Millisecond => Millisecond,
        Second => Second,
        Minute => Minute,
        Hour => Hour,
        Day => Day,
        Week => Week,
        Month => Month,
        Quarter => Quarter,
        Year => Year,
    }
}

keyword_enum! {
    /// Target type of `CAST(expr AS type)`
    DataType {
        Date => Date,
        Time => Time,
        Timestamp => Timestamp,
        Int => Int,
        Integer => Integer,
        Double => Double,
        Long => Long,
        Float => Float,
        String => String,
        Boolean => Boolean,
    }
}

keyword_enum! {
    GetFormatType {
        Date => Date,
        Datetime => Datetime,
        Time => Time,
        Timestamp => Timestamp,
    }
}

keyword_enum! {
    TimestampFunction {
        Add => Timestampadd,
        Diff => Timestampdiff,
    }
}

// ============ Operators ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum LogicalOperator {
    And,
    Or,
    Xor,
}

impl LogicalOperator {
    /// Binding power; higher binds tighter
    pub fn binding_power(self) -> u8 {
        match self {
            LogicalOperator::Or => 5,
            LogicalOperator::And => 4,
            LogicalOperator::Xor => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    Less,
    NotGreater,
    Greater,
    NotLess,
    Regexp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ArithmeticOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl ArithmeticOperator {
    pub fn binding_power(self) -> u8 {
        match self {
            ArithmeticOperator::Add | ArithmeticOperator::Subtract => 7,
            ArithmeticOperator::Multiply | ArithmeticOperator::Divide | ArithmeticOperator::Modulo => 8,
        }
    }
}

/// Binding power of the `NOT` prefix operand
pub const NOT_BINDING_POWER: u8 = 6;

// ============ Expressions ============

/// Any expression: the right-hand side of `eval`, a function argument, a
/// `parse`/`grok` source
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Expression {
    Logical(LogicalExpr),
    Comparison(ComparisonExpr),
    Value(ValueExpr),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum LogicalExpr {
    Binary {
        left: Box<LogicalExpr>,
        op: LogicalOperator,
        right: Box<LogicalExpr>,
    },
    Not(Box<LogicalExpr>),
    Comparison(ComparisonExpr),
    Relevance(RelevanceExpr),
    /// Condition function used as a predicate, e.g. `isnull(a)`
    Boolean(FunctionCall),
}

impl LogicalExpr {
    pub fn and(left: LogicalExpr, right: LogicalExpr) -> Self {
        Self::binary(left, LogicalOperator::And, right)
    }

    pub fn binary(left: LogicalExpr, op: LogicalOperator, right: LogicalExpr) -> Self {
        LogicalExpr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ComparisonExpr {
    Compare {
        left: ValueExpr,
        op: ComparisonOperator,
        right: ValueExpr,
    },
    In {
        value: ValueExpr,
        list: Vec<Literal>,
    },
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ValueExpr {
    BinaryArithmetic {
        left: Box<ValueExpr>,
        op: ArithmeticOperator,
        right: Box<ValueExpr>,
    },
    FunctionCall(FunctionCall),
    Cast {
        expr: Box<Expression>,
        data_type: DataType,
    },
    Literal(Literal),
    Field(QualifiedName),
    Parenthesized(Box<ValueExpr>),
    Position {
        substring: Box<ValueExpr>,
        string: Box<ValueExpr>,
    },
    Extract {
        part: DateTimeUnit,
        arg: Box<ValueExpr>,
    },
    Timestamp {
        function: TimestampFunction,
        unit: DateTimeUnit,
        first: Box<ValueExpr>,
        second: Box<ValueExpr>,
    },
    GetFormat {
        format_type: GetFormatType,
        arg: Box<ValueExpr>,
    },
}

impl ValueExpr {
    pub fn field(name: impl Into<String>) -> Self {
        ValueExpr::Field(QualifiedName::single(name))
    }

    pub fn int(value: i64) -> Self {
        ValueExpr::Literal(Literal::int(value))
    }

    pub fn binary(left: ValueExpr, op: ArithmeticOperator, right: ValueExpr) -> Self {
        ValueExpr::BinaryArithmetic {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }
}

// ============ Function calls ============

/// Call of a built-in eval function
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FunctionCall {
    /// Lower-case canonical name
    pub name: String,
    pub family: FunctionFamily,
    pub args: Vec<FunctionArg>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FunctionArg {
    pub name: Option<super::Ident>,
    pub value: Expression,
}

impl FunctionArg {
    pub fn positional(value: Expression) -> Self {
        Self { name: None, value }
    }
}

keyword_enum! {
    SingleFieldRelevance {
        Match => Match,
        MatchPhrase => MatchPhrase,
        MatchBoolPrefix => MatchBoolPrefix,
        MatchPhrasePrefix => MatchPhrasePrefix,
    }
}

keyword_enum! {
    MultiFieldRelevance {
        SimpleQueryString => SimpleQueryString,
        MultiMatch => MultiMatch,
        QueryString => QueryString,
    }
}

/// Full-text search predicate
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum RelevanceExpr {
    SingleField {
        function: SingleFieldRelevance,
        field: RelevanceField,
        query: RelevanceValue,
        args: Vec<RelevanceArg>,
    },
    MultiField {
        function: MultiFieldRelevance,
        fields: Vec<WeightedField>,
        query: RelevanceValue,
        args: Vec<RelevanceArg>,
    },
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum RelevanceField {
    Name(QualifiedName),
    Quoted(String),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WeightedField {
    pub field: RelevanceField,
    /// Integer or decimal boost written after `^`
    pub weight: Option<Literal>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum RelevanceValue {
    Name(QualifiedName),
    Literal(Literal),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RelevanceArg {
    /// Lower-case argument name
    pub name: String,
    pub value: RelevanceValue,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyword::Keyword;

    #[test]
    fn integer_literal_values() {
        assert_eq!(IntegerLiteral::new(-5).value(), Some(-5));
        assert_eq!(IntegerLiteral::new(-5).sign, Some(Sign::Minus));
        assert_eq!(IntegerLiteral::new(7).sign, None);
        let huge = IntegerLiteral {
            sign: None,
            digits: "99999999999999999999".into(),
        };
        assert_eq!(huge.value(), None);
    }

    #[test]
    fn decimal_literal_values() {
        let lit = DecimalLiteral {
            sign: Some(Sign::Minus),
            digits: ".5".into(),
        };
        assert_eq!(lit.value(), Some(-0.5));
    }

    #[test]
    fn unit_keywords() {
        assert_eq!(DateTimeUnit::from_keyword(Keyword::DayHour), Some(DateTimeUnit::DayHour));
        assert!(DateTimeUnit::DayHour.is_compound());
        assert!(!DateTimeUnit::Day.is_compound());
        assert_eq!(TimespanUnit::from_keyword(Keyword::Ms), Some(TimespanUnit::Ms));
        assert_eq!(DataType::from_keyword(Keyword::Count), None);
        assert_eq!(TimestampFunction::Add.to_string(), "TIMESTAMPADD");
    }

    #[test]
    fn binding_powers() {
        assert!(LogicalOperator::Or.binding_power() > LogicalOperator::And.binding_power());
        assert!(LogicalOperator::And.binding_power() > LogicalOperator::Xor.binding_power());
        assert!(NOT_BINDING_POWER > LogicalOperator::Or.binding_power());
        assert!(
            ArithmeticOperator::Multiply.binding_power() > ArithmeticOperator::Add.binding_power()
        );
    }
}
