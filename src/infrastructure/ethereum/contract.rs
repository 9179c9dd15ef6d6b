//! Shared wallet contract bindings using alloy's `sol!` macro

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

sol! {
    #[sol(bytecode = "0x608060405234801561001057600080fd5b5061001a3361001f565b61006f565b600080546001600160a01b038381166001600160a01b0319831681178455604051919092169283917f8be0079c531659141344cd1fd0a4f28419497f9722a3daafe3b4186f6b6457e09190a35050565b6108d48061007e6000396000f3fe6080604052600436106100a05760003560e01c8063715018a611610064578063715018a6146101885780638da5cb5b1461019d5780638fdf08df146101c55780639b96eece146101e5578063ee4ae2c914610205578063f2fde38b1461022557600080fd5b806312065fe0146100e1578063310ec4a71461010457806339509351146101265780633e5beab9146101465780636f9fb98a1461017357600080fd5b366100dc5760405134815233907f27b15ed4cf832749ed39f33a64e4707ed60a761485e41ffec7343ecaddc0c02a9060200160405180910390a2005b600080fd5b3480156100ed57600080fd5b5033315b6040519081526020015b60405180910390f35b34801561011057600080fd5b5061012461011f3660046107d4565b610245565b005b34801561013257600080fd5b506101246101413660046107d4565b6102ea565b34801561015257600080fd5b506100f1610161366004610800565b60016020526000908152604090205481565b34801561017f57600080fd5b506100f16103a5565b34801561019457600080fd5b506101246103d5565b3480156101a957600080fd5b506000546040516001600160a01b0390911681526020016100fb565b3480156101d157600080fd5b506101246101e03660046107d4565b61040b565b3480156101f157600080fd5b506100f1610200366004610800565b6104bd565b34801561021157600080fd5b506101246102203660046107d4565b6104f6565b34801561023157600080fd5b50610124610240366004610800565b6106b0565b6000546001600160a01b031633146102785760405162461bcd60e51b815260040161026f90610824565b60405180910390fd5b6001600160a01b0382166000818152600160209081526040918290205482519081529081018490523392917f3691d1a86d99355e52b689ca70a7bdf6d80763237a6aa06e5fa43964eac7244b910160405180910390a36001600160a01b03909116600090815260016020526040902055565b6000546001600160a01b031633146103145760405162461bcd60e51b815260040161026f90610824565b6001600160a01b0382166000818152600160205260409020543391907f3691d1a86d99355e52b689ca70a7bdf6d80763237a6aa06e5fa43964eac7244b9061035c858261086f565b6040805192835260208301919091520160405180910390a36001600160a01b0382166000908152600160205260408120805483929061039c90849061086f565b90915550505050565b600080546001600160a01b031633146103d05760405162461bcd60e51b815260040161026f90610824565b504790565b6000546001600160a01b031633146103ff5760405162461bcd60e51b815260040161026f90610824565b610409600061074b565b565b6000546001600160a01b031633146104355760405162461bcd60e51b815260040161026f90610824565b6001600160a01b0382166000818152600160205260409020543391907f3691d1a86d99355e52b689ca70a7bdf6d80763237a6aa06e5fa43964eac7244b9061047d8582610887565b6040805192835260208301919091520160405180910390a36001600160a01b0382166000908152600160205260408120805483929061039c908490610887565b600080546001600160a01b031633146104e85760405162461bcd60e51b815260040161026f90610824565b506001600160a01b03163190565b6104fe61079b565b61054a5760405162461bcd60e51b815260206004820152601a60248201527f556e617574686f72697a656420746f2073656e64206d6f6e6579000000000000604482015260640161026f565b8047101561059a5760405162461bcd60e51b815260206004820152601b60248201527f546865726520617265206e6f7420656e6f75676820666f756e64730000000000604482015260640161026f565b6001600160a01b0382166000908152600160205260409020548111156106285760405162461bcd60e51b815260206004820152603c60248201527f41737369676e656420616c6c6f77616e6365206973206e6f7420656e6f75676860448201527f20746f20706572666f726d2074686973207472616e73616374696f6e00000000606482015260840161026f565b610632828261040b565b816001600160a01b03167f7f51d406915971d4ac1c91af96be5187ea6ab64753785aad519a533def80a41e8260405161066d91815260200190565b60405180910390a26040516001600160a01b0383169082156108fc029083906000818181858888f193505050501580156106ab573d6000803e3d6000fd5b505050565b6000546001600160a01b031633146106da5760405162461bcd60e51b815260040161026f90610824565b6001600160a01b03811661073f5760405162461bcd60e51b815260206004820152602660248201527f4f776e61626c653a206e6577206f776e657220697320746865207a65726f206160448201526564647265737360d01b606482015260840161026f565b6107488161074b565b50565b600080546001600160a01b038381166001600160a01b0319831681178455604051919092169283917f8be0079c531659141344cd1fd0a4f28419497f9722a3daafe3b4186f6b6457e09190a35050565b6000336107b06000546001600160a01b031690565b6001600160a01b031614905090565b6001600160a01b038116811461074857600080fd5b600080604083850312156107e757600080fd5b82356107f2816107bf565b946020939093013593505050565b60006020828403121561081257600080fd5b813561081d816107bf565b9392505050565b6020808252818101527f4f776e61626c653a2063616c6c6572206973206e6f7420746865206f776e6572604082015260600190565b634e487b7160e01b600052601160045260246000fd5b6000821982111561088257610882610859565b500190565b60008282101561089957610899610859565b50039056fea26469706673582212207f6e9d17987ebe051cdc5441600fa097bc7f83ded0635124359d351a5a6507ff64736f6c634300080a0033")]
    contract SharedWallet {
        event AllowanceChanged(address indexed beneficiary, address indexed sender, uint256 prevAmount, uint256 newAmount);
        event MoneyReceived(address indexed from, uint256 amount);
        event MoneySent(address indexed beneficiary, uint256 amount);
        event OwnershipTransferred(address indexed previousOwner, address indexed newOwner);

        function allowance(address _beneficiary) external view returns (uint256);
        function getBalance() external view returns (uint256);
        function getBalanceOf(address _address) external view returns (uint256);
        function getContractBalance() external view returns (uint256);
        function owner() external view returns (address);
        function setAllowance(address _beneficiary, uint256 _amount) external;
        function increaseAllowance(address _beneficiary, uint256 _amount) external;
        function reduceAllowance(address _beneficiary, uint256 _amount) external;
        function sendMoney(address _to, uint256 _amount) external;
        function transferOwnership(address newOwner) external;
        function renounceOwnership() external;
    }
}

/// A state-changing contract invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractMethod {
    SetAllowance { beneficiary: Address, amount: U256 },
    IncreaseAllowance { beneficiary: Address, amount: U256 },
    ReduceAllowance { beneficiary: Address, amount: U256 },
    SendMoney { to: Address, amount: U256 },
    TransferOwnership { new_owner: Address },
    /// Plain value transfer hitting the payable `receive()`
    Receive,
}

impl ContractMethod {
    /// ABI-encoded calldata. `receive()` takes none.
    pub fn calldata(&self) -> Bytes {
        let encoded = match self {
            ContractMethod::SetAllowance { beneficiary, amount } => SharedWallet::setAllowanceCall {
                _beneficiary: *beneficiary,
                _amount: *amount,
            }
            .abi_encode(),
            ContractMethod::IncreaseAllowance { beneficiary, amount } => {
                SharedWallet::increaseAllowanceCall {
                    _beneficiary: *beneficiary,
                    _amount: *amount,
                }
                .abi_encode()
            }
            ContractMethod::ReduceAllowance { beneficiary, amount } => {
                SharedWallet::reduceAllowanceCall {
                    _beneficiary: *beneficiary,
                    _amount: *amount,
                }
                .abi_encode()
            }
            ContractMethod::SendMoney { to, amount } => SharedWallet::sendMoneyCall {
                _to: *to,
                _amount: *amount,
            }
            .abi_encode(),
            ContractMethod::TransferOwnership { new_owner } => {
                SharedWallet::transferOwnershipCall {
                    newOwner: *new_owner,
                }
                .abi_encode()
            }
            ContractMethod::Receive => Vec::new(),
        };
        Bytes::from(encoded)
    }

    /// Operation label used for transaction accounting.
    pub fn operation(&self) -> &'static str {
        match self {
            ContractMethod::SetAllowance { .. } => "set_allowance",
            ContractMethod::IncreaseAllowance { .. } => "increase_allowance",
            ContractMethod::ReduceAllowance { .. } => "reduce_allowance",
            ContractMethod::SendMoney { .. } => "send",
            ContractMethod::TransferOwnership { .. } => "transfer_owner",
            ContractMethod::Receive => "receive",
        }
    }
}

/// Creation bytecode for deploying a fresh shared wallet.
pub fn creation_code() -> Bytes {
    SharedWallet::BYTECODE.clone()
}
