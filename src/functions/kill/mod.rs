pub mod frequency;
pub mod miss_cycle;
pub mod tail;
pub mod zone;
pub mod neighbor;
pub mod parity;
pub mod sum;
pub mod transition;
pub mod consecutive;
pub mod periodicity;
pub mod difference;
pub mod cooccurrence;

pub use consecutive::{ConsecutiveDecay, ConsecutiveExclusion};
pub use cooccurrence::CoOccurrenceInversion;
pub use difference::DifferenceInversion;
pub use frequency::FrequencyInverse;
pub use miss_cycle::MissCycle;
pub use neighbor::NeighborExclusion;
pub use parity::OddEvenBalance;
pub use periodicity::PeriodicityExclusion;
pub use sum::SumDeviation;
pub use tail::{TailConstraint, TailExclusion};
pub use transition::{MarkovReverse, TransitionProbability};
pub use zone::ZoneCold;
