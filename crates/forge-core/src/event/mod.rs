// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Progress notification for compilations.
//!
//! The only externally observable event of the compiler is "this asset
//! reached a terminal state". It is delivered either to a
//! [`CompilationObserver`] passed into the compile call, or broadcast on an
//! [`EventBus`] as an [`AssetCompiledEvent`]. Handlers run on whatever thread
//! performed the compile.

mod bus;

pub use self::bus::EventBus;

use crate::asset::AssetItem;
use crate::result::AssetCompilerResult;

/// An asset finished compiling, successfully or not.
#[derive(Debug, Clone)]
pub struct AssetCompiledEvent {
    /// The compiled asset.
    pub item: AssetItem,
    /// The asset's own result, including any dependency results merged into it.
    pub result: AssetCompilerResult,
}

/// Receives a callback once per asset that reaches a terminal state.
pub trait CompilationObserver {
    /// Called exactly once per compiled asset.
    fn on_asset_compiled(&mut self, item: &AssetItem, result: &AssetCompilerResult);
}

impl<F> CompilationObserver for F
where
    F: FnMut(&AssetItem, &AssetCompilerResult),
{
    fn on_asset_compiled(&mut self, item: &AssetItem, result: &AssetCompilerResult) {
        self(item, result)
    }
}

impl CompilationObserver for flume::Sender<AssetCompiledEvent> {
    fn on_asset_compiled(&mut self, item: &AssetItem, result: &AssetCompilerResult) {
        // A dropped receiver only means nobody is listening anymore.
        let _ = self.send(AssetCompiledEvent {
            item: item.clone(),
            result: result.clone(),
        });
    }
}

impl CompilationObserver for &EventBus<AssetCompiledEvent> {
    fn on_asset_compiled(&mut self, item: &AssetItem, result: &AssetCompilerResult) {
        self.publish(AssetCompiledEvent {
            item: item.clone(),
            result: result.clone(),
        });
    }
}
