pub mod input;
pub mod instruction;
pub mod memory;
pub mod output;
pub mod processor;

pub use input::InputExtension;
pub use instruction::InstructionExtension;
pub use memory::MemoryExtension;
pub use output::OutputExtension;
pub use processor::ProcessorExtension;
