//! This module contains the evolutionary search over candidate grids.
//!
//! The search operates on a population of *individuals*: completely filled
//! grids in which every row is a permutation of the digits 1 to 9 and every
//! clue of the puzzle keeps its original value. This invariant is
//! established by [initial_population] and preserved by [crossover] (which
//! only ever exchanges whole rows) and [mutate] (which only ever swaps two
//! non-clue cells within one row). Column and box constraints are *not*
//! maintained structurally; they are what the selection pressure of the
//! [EvolutionEngine] optimizes, guided by the
//! [fitness](crate::fitness::fitness) score.

use crate::{ClueMask, SIZE, SudokuGrid, TrackedGrid};
use crate::error::{ConfigError, ConfigResult, SudokuResult};
use crate::fitness::{MAX_FITNESS, fitness};
use crate::generator::shuffle;
use crate::util::DigitSet;

use rand::Rng;
use rand::rngs::ThreadRng;

use serde::{Deserialize, Serialize};

use std::str::FromStr;

/// An enumeration of the parent selection policies supported by the
/// [EvolutionEngine]. The policy is part of the [EvolutionConfig]; an
/// unrecognized identifier is rejected with
/// [ConfigError::UnknownSelection] rather than silently replaced by a
/// default.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionStrategy {

    /// Fitness-proportionate selection: the probability of drawing an
    /// individual is its fitness divided by the population's total fitness.
    /// Full candidate grids always score at least 27, so the total is
    /// strictly positive under the canonical fitness scale.
    Roulette,

    /// Tournament selection: a fixed number of distinct individuals is
    /// sampled uniformly, the fittest of them wins. The tournament size is
    /// configured by [EvolutionConfig::tournament_size].
    Tournament
}

impl SelectionStrategy {
    fn select<'a, R: Rng>(self, population: &'a [SudokuGrid],
            scores: &[usize], tournament_size: usize, rng: &mut R)
            -> &'a SudokuGrid {
        match self {
            SelectionStrategy::Roulette =>
                select_roulette(population, scores, rng),
            SelectionStrategy::Tournament =>
                select_tournament(population, scores, tournament_size, rng)
        }
    }
}

impl FromStr for SelectionStrategy {
    type Err = ConfigError;

    /// Parses a selection strategy identifier as used by the wire format.
    /// Recognized identifiers are `roulette` and `tournament`; anything
    /// else is rejected with [ConfigError::UnknownSelection].
    fn from_str(identifier: &str) -> Result<SelectionStrategy, ConfigError> {
        match identifier {
            "roulette" => Ok(SelectionStrategy::Roulette),
            "tournament" => Ok(SelectionStrategy::Tournament),
            _ => Err(ConfigError::UnknownSelection(identifier.to_owned()))
        }
    }
}

fn select_roulette<'a, R: Rng>(population: &'a [SudokuGrid],
        scores: &[usize], rng: &mut R) -> &'a SudokuGrid {
    // full candidates score at least 27 per individual, so the wheel total
    // is strictly positive
    let total: usize = scores.iter().sum();
    debug_assert!(total > 0);
    let mut draw = rng.gen_range(0..total);

    for (individual, &score) in population.iter().zip(scores.iter()) {
        if draw < score {
            return individual;
        }

        draw -= score;
    }

    // unreachable for draw < total, but the compiler cannot know that
    &population[population.len() - 1]
}

fn select_tournament<'a, R: Rng>(population: &'a [SudokuGrid],
        scores: &[usize], tournament_size: usize, rng: &mut R)
        -> &'a SudokuGrid {
    let entrants = shuffle(rng, 0..population.len());
    let winner = entrants.iter()
        .take(tournament_size)
        .max_by_key(|&&index| scores[index])
        .unwrap();
    &population[*winner]
}

/// The configuration of the [EvolutionEngine]. All fields have the
/// documented defaults provided by the [Default] implementation, which also
/// substitute for absent fields when deserializing; out-of-range values are
/// rejected by [EvolutionConfig::validate] before any search begins.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct EvolutionConfig {

    /// The maximum number of generations to evolve before the search gives
    /// up. Defaults to 2000.
    pub generations: usize,

    /// The number of individuals kept in the population. Must be positive.
    /// Defaults to 170.
    pub population_size: usize,

    /// The probability that a freshly bred individual is mutated. Must lie
    /// in `[0, 1]`. Defaults to 0.25.
    pub mutation_rate: f64,

    /// The fraction of the population that is carried unchanged into the
    /// next generation as the elite. Must lie in `[0, 1]`; the elite count
    /// is the product with the population size, rounded down. Defaults to
    /// 0.25.
    pub elite_fraction: f64,

    /// The parent selection policy. Defaults to
    /// [SelectionStrategy::Roulette].
    #[serde(rename = "selectionType")]
    pub selection: SelectionStrategy,

    /// The number of individuals sampled per tournament when
    /// [SelectionStrategy::Tournament] is selected. Must be positive and at
    /// most the population size. Defaults to 5.
    pub tournament_size: usize,

    /// If present, the search terminates early once the best fitness has
    /// not improved for this many consecutive generations. Defaults to
    /// `None`, i.e. no stagnation stop.
    pub stagnation_limit: Option<usize>
}

impl Default for EvolutionConfig {
    fn default() -> EvolutionConfig {
        EvolutionConfig {
            generations: 2000,
            population_size: 170,
            mutation_rate: 0.25,
            elite_fraction: 0.25,
            selection: SelectionStrategy::Roulette,
            tournament_size: 5,
            stagnation_limit: None
        }
    }
}

impl EvolutionConfig {

    /// Checks all fields of this configuration and returns the first
    /// problem found, if any. The [EvolutionEngine] applies this check on
    /// construction, so an engine never runs with an invalid configuration.
    ///
    /// # Errors
    ///
    /// * `ConfigError::InvalidPopulationSize` If the population size is
    /// zero.
    /// * `ConfigError::MutationRateOutOfRange` If the mutation rate is not
    /// in `[0, 1]`.
    /// * `ConfigError::EliteFractionOutOfRange` If the elite fraction is
    /// not in `[0, 1]`.
    /// * `ConfigError::InvalidTournamentSize` If tournament selection is
    /// configured with a tournament size of zero or greater than the
    /// population size.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.population_size == 0 {
            return Err(ConfigError::InvalidPopulationSize);
        }

        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(
                ConfigError::MutationRateOutOfRange(self.mutation_rate));
        }

        if !(0.0..=1.0).contains(&self.elite_fraction) {
            return Err(
                ConfigError::EliteFractionOutOfRange(self.elite_fraction));
        }

        if self.selection == SelectionStrategy::Tournament &&
                (self.tournament_size == 0 ||
                    self.tournament_size > self.population_size) {
            return Err(ConfigError::InvalidTournamentSize {
                size: self.tournament_size,
                population_size: self.population_size
            });
        }

        Ok(())
    }

    fn elite_count(&self) -> usize {
        (self.elite_fraction * self.population_size as f64) as usize
    }
}

/// Creates one individual from the given puzzle: the clues are copied and
/// the empty cells of each row are filled with the row's missing digits in
/// random order. Every row of the result is therefore a permutation of 1 to
/// 9; columns and boxes are typically still in violation. This is
/// intentional: the row invariant is what the genetic operators preserve
/// cheaply, everything else is left to selection pressure.
pub fn seed_individual<R: Rng>(puzzle: &SudokuGrid, rng: &mut R)
        -> SudokuGrid {
    let mut individual = puzzle.clone();

    for row in 0..SIZE {
        let mut present = DigitSet::new();

        for column in 0..SIZE {
            if let Some(number) = individual.get_cell(column, row).unwrap() {
                present.insert(number);
            }
        }

        let missing = shuffle(rng, present.missing().iter());
        let mut next_digit = missing.into_iter();

        for column in 0..SIZE {
            if individual.get_cell(column, row).unwrap().is_none() {
                let number = next_digit.next().unwrap();
                individual.set_cell(column, row, number).unwrap();
            }
        }
    }

    individual
}

/// Creates an initial population of the given size for the given puzzle.
/// Every individual satisfies the row-permutation and clue-retention
/// invariants described in the [module documentation](self).
pub fn initial_population<R: Rng>(puzzle: &SudokuGrid, size: usize,
        rng: &mut R) -> Vec<SudokuGrid> {
    (0..size)
        .map(|_| seed_individual(puzzle, rng))
        .collect()
}

fn write_cell(grid: &mut SudokuGrid, column: usize, row: usize,
        content: Option<usize>) {
    match content {
        Some(number) => grid.set_cell(column, row, number).unwrap(),
        None => grid.clear_cell(column, row).unwrap()
    }
}

/// Recombines the two given parents into a child: each of the 9 rows is
/// taken from the first or second parent with probability 0.5 each. Rows
/// are never mixed internally, so a child of two individuals that satisfy
/// the row-permutation and clue-retention invariants satisfies them as
/// well.
pub fn crossover<R: Rng>(first: &SudokuGrid, second: &SudokuGrid,
        rng: &mut R) -> SudokuGrid {
    let mut child = first.clone();

    for row in 0..SIZE {
        if rng.gen::<bool>() {
            for column in 0..SIZE {
                let content = second.get_cell(column, row).unwrap();
                write_cell(&mut child, column, row, content);
            }
        }
    }

    child
}

/// Mutates the given individual with the given probability: one random row
/// is chosen, and two random non-clue cells within it swap their contents.
/// A swap within a row cannot introduce a row duplicate and never touches a
/// cell fixed by the mask, so both invariants are preserved. Rows with
/// fewer than two free cells are left unchanged.
pub fn mutate<R: Rng>(individual: &mut SudokuGrid, mask: &ClueMask,
        mutation_rate: f64, rng: &mut R) {
    if rng.gen::<f64>() >= mutation_rate {
        return;
    }

    let row = rng.gen_range(0..SIZE);
    let free_columns = mask.free_columns(row).unwrap();

    if free_columns.len() < 2 {
        return;
    }

    let picks = shuffle(rng, free_columns.into_iter());
    let first_column = picks[0];
    let second_column = picks[1];

    let first = individual.get_cell(first_column, row).unwrap();
    let second = individual.get_cell(second_column, row).unwrap();
    write_cell(individual, first_column, row, second);
    write_cell(individual, second_column, row, first);
}

/// An enumeration of the ways a run of the [EvolutionEngine] can terminate.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Termination {

    /// A perfect candidate (fitness 243) was found within the generation
    /// budget.
    Solved,

    /// The generation budget was exhausted, or the stagnation limit was
    /// reached, without finding a perfect candidate. This is a normal
    /// outcome, not an error; the best individual found is still reported.
    Exhausted
}

/// The result of a run of the [EvolutionEngine].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EvolutionOutcome {

    /// The best grid found by the search. If `termination` is
    /// [Termination::Solved], this is a perfect solution.
    pub grid: SudokuGrid,

    /// The index of the generation in which the search ended: the
    /// generation in which a perfect candidate appeared, the generation at
    /// which stagnation was detected, or the generation budget.
    pub generation: usize,

    /// How the search terminated.
    pub termination: Termination
}

impl EvolutionOutcome {

    /// Indicates whether the search found an exact solution.
    pub fn is_solution(&self) -> bool {
        self.termination == Termination::Solved
    }
}

/// The engine that orchestrates the evolutionary search: it initializes a
/// population from a puzzle and then, generation by generation, carries the
/// elite over unchanged and fills the remainder of the next population with
/// mutated recombinations of selected parents, until a perfect candidate
/// appears or the generation budget is exhausted.
///
/// The random number generator is injected, so seeded runs are
/// reproducible.
pub struct EvolutionEngine<R: Rng> {
    config: EvolutionConfig,
    rng: R
}

impl EvolutionEngine<ThreadRng> {

    /// Creates a new engine with the default [EvolutionConfig] and a
    /// [ThreadRng].
    pub fn new_default() -> EvolutionEngine<ThreadRng> {
        EvolutionEngine::new(EvolutionConfig::default(), rand::thread_rng())
            .unwrap()
    }
}

impl<R: Rng> EvolutionEngine<R> {

    /// Creates a new engine with the given configuration and random number
    /// generator.
    ///
    /// # Errors
    ///
    /// If the configuration is invalid. See [EvolutionConfig::validate] for
    /// the possible errors.
    pub fn new(config: EvolutionConfig, rng: R)
            -> ConfigResult<EvolutionEngine<R>> {
        config.validate()?;

        Ok(EvolutionEngine {
            config,
            rng
        })
    }

    /// Gets a reference to the configuration of this engine.
    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    fn breed(&mut self, population: &[SudokuGrid], scores: &[usize],
            mask: &ClueMask) -> Vec<SudokuGrid> {
        let elite_count = self.config.elite_count();
        let selection = self.config.selection;
        let tournament_size = self.config.tournament_size;

        // stable sort: ties keep their original population order
        let mut by_fitness: Vec<usize> = (0..population.len()).collect();
        by_fitness.sort_by(|&a, &b| scores[b].cmp(&scores[a]));

        let mut next: Vec<SudokuGrid> = by_fitness.iter()
            .take(elite_count)
            .map(|&i| population[i].clone())
            .collect();

        while next.len() < self.config.population_size {
            let first = selection.select(population, scores,
                tournament_size, &mut self.rng);
            let second = selection.select(population, scores,
                tournament_size, &mut self.rng);
            let mut child = crossover(first, second, &mut self.rng);
            mutate(&mut child, mask, self.config.mutation_rate,
                &mut self.rng);
            next.push(child);
        }

        next
    }

    /// Runs the evolutionary search on the given puzzle until a perfect
    /// candidate is found, the generation budget is exhausted, or the
    /// configured stagnation limit is reached. Exhausting the budget is a
    /// normal outcome: the best individual of the final population is
    /// returned with [Termination::Exhausted].
    ///
    /// # Errors
    ///
    /// * `SudokuError::ContradictoryPuzzle` If the puzzle contains two
    /// equal clues within one row, column, or box. The puzzle is rejected
    /// before any search begins.
    pub fn run(&mut self, puzzle: &SudokuGrid)
            -> SudokuResult<EvolutionOutcome> {
        TrackedGrid::from_grid(puzzle.clone())?;

        let mask = ClueMask::from_puzzle(puzzle);
        let mut population = initial_population(puzzle,
            self.config.population_size, &mut self.rng);
        let mut best_seen = 0;
        let mut stagnant_generations = 0;

        for generation in 0..self.config.generations {
            let scores: Vec<usize> =
                population.iter().map(fitness).collect();

            if let Some(solution) =
                    scores.iter().position(|&score| score == MAX_FITNESS) {
                return Ok(EvolutionOutcome {
                    grid: population.swap_remove(solution),
                    generation,
                    termination: Termination::Solved
                });
            }

            if let Some(limit) = self.config.stagnation_limit {
                let best = *scores.iter().max().unwrap();

                if best > best_seen {
                    best_seen = best;
                    stagnant_generations = 0;
                }
                else {
                    stagnant_generations += 1;

                    if stagnant_generations >= limit {
                        return Ok(best_outcome(population, generation));
                    }
                }
            }

            population = self.breed(&population, &scores, &mask);
        }

        Ok(best_outcome(population, self.config.generations))
    }
}

fn best_outcome(mut population: Vec<SudokuGrid>, generation: usize)
        -> EvolutionOutcome {
    let mut best_index = 0;
    let mut best_score = 0;

    // ties keep the earliest individual
    for (index, individual) in population.iter().enumerate() {
        let score = fitness(individual);

        if score > best_score {
            best_score = score;
            best_index = index;
        }
    }

    EvolutionOutcome {
        grid: population.swap_remove(best_index),
        generation,
        termination: Termination::Exhausted
    }
}
