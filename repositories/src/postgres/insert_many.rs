use itertools::Itertools;
use std::marker::PhantomData;
use tokio_postgres::types::ToSql;

#[cfg(test)]
use dyn_eq::DynEq;

#[cfg(not(test))]
pub trait InsertManyValue: ToSql + Send + Sync + 'static {}

#[cfg(not(test))]
impl<T> InsertManyValue for T where T: ToSql + Send + Sync + 'static {}

#[cfg(test)]
pub trait InsertManyValue: ToSql + Send + Sync + DynEq + 'static {}

#[cfg(test)]
impl<T> InsertManyValue for T where T: ToSql + Send + Sync + DynEq + 'static {}

/// A single multi-row `INSERT` along with its positional parameters.
pub struct InsertMany {
    pub query: String,
    params: Vec<Box<dyn InsertManyValue>>,
}

impl InsertMany {
    pub fn params(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|p| &**p as &(dyn ToSql + Sync))
            .collect()
    }
}

macro_rules! value_set {
    ($($val:expr => $t:ty),+) => {
        crate::postgres::insert_many::ValueSet::<_, ($($t,)+)>::new([$(crate::postgres::insert_many::Value::from($val)),+])
    };
}

pub(crate) use value_set;

pub struct Value(Box<dyn InsertManyValue>);

impl<T> From<T> for Value
where
    T: InsertManyValue,
{
    fn from(value: T) -> Self {
        Self(Box::new(value))
    }
}

/// One row's worth of values. `T` pins the column types so every row of a builder
/// lines up with the first one.
pub struct ValueSet<const N: usize, T> {
    values: [Value; N],
    _phantom: PhantomData<T>,
}

impl<const N: usize, T> ValueSet<N, T> {
    pub fn new(values: [Value; N]) -> Self {
        Self {
            values,
            _phantom: PhantomData,
        }
    }
}

pub struct InsertManyBuilder<const COLS: usize, T> {
    table: &'static str,
    col_names: [&'static str; COLS],
    value_sets: Vec<ValueSet<COLS, T>>,
}

impl<const COLS: usize, T> InsertManyBuilder<COLS, T> {
    pub fn new(
        table: &'static str,
        col_names: [&'static str; COLS],
        starting_set: ValueSet<COLS, T>,
    ) -> Self {
        Self {
            table,
            col_names,
            value_sets: vec![starting_set],
        }
    }

    pub fn add_value_set(&mut self, value: ValueSet<COLS, T>) -> &mut Self {
        self.value_sets.push(value);
        self
    }

    pub fn build(self) -> InsertMany {
        let rows = (0..self.value_sets.len())
            .map(|row| {
                let placeholders = (1..=COLS).map(|col| format!("${}", row * COLS + col)).join(",");
                format!("({placeholders})")
            })
            .join(",");

        let query = format!(
            "INSERT INTO {} ({}) VALUES {rows}",
            self.table,
            self.col_names.iter().join(","),
        );

        let params = self
            .value_sets
            .into_iter()
            .flat_map(|set| set.values.into_iter().map(|v| v.0))
            .collect();

        InsertMany { query, params }
    }
}
